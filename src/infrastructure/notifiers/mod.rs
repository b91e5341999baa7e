pub mod chat_bot;
pub mod email;
pub mod fanout;
pub mod rich_card;
pub mod webhook;

pub use chat_bot::ChatBotNotifier;
pub use email::EmailNotifier;
pub use fanout::NotifierFanout;
pub use rich_card::RichCardNotifier;
pub use webhook::WebhookNotifier;
