//! `docentify intents` and `docentify lemmas` - catalog diagnostics

use docentify::intent::Intent;
use docentify::nlp::Lemmatizer;

pub fn list_intents() {
    for intent in Intent::ALL {
        println!("{:<16} {}", intent.label(), intent.keywords().join(", "));
    }
}

pub fn show_lemmas(text: &str) {
    let lemmatizer = Lemmatizer::for_catalog();
    let lemmas = lemmatizer.lemmatize(text);

    if lemmas.is_empty() {
        println!("(no words)");
        return;
    }
    println!("{}", lemmas.join(" "));
}
