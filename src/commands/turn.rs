//! `docentify ask` - one chatbot turn from the command line

use anyhow::Result;

use docentify::chatbot::Chatbot;
use docentify::config::Config;
use docentify::conversation::ConversationContext;

pub fn execute(config: &Config, message: &str, user: &str, attempts: u32, json: bool) -> Result<()> {
    let chatbot = Chatbot::load(config)?;
    let reply = chatbot.respond(message, user, ConversationContext::new(attempts))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        println!("{}", reply.message);
        println!("\n(attempts: {})", reply.context.attempts);
    }

    Ok(())
}
