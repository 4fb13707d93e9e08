use crate::models::DatasetConfig;
use crate::services::{ask_ai, shared_client, Filter, TextService};

pub async fn run(config: &DatasetConfig, question: &str, filter: &Filter) {
    let (marketing, business) = super::load_or_exit(config);
    let (marketing, business) = filter.apply(&marketing, &business);

    println!("🤖 {}\n", question);

    let client = shared_client();
    let service = client.as_deref().map(|c| c as &dyn TextService);
    let answer = ask_ai(question, &marketing, &business, service).await;

    println!("{}", answer.trim());
}
