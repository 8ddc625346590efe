pub mod message;
pub mod telegram;

pub use telegram::{Notifier, TelegramNotifier};
