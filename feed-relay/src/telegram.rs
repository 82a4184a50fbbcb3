use crate::traits::MessageSink;
use crate::types::{DeliveryPayload, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode};
use tracing::info;
use url::Url;

/// Posts photos with a Markdown caption into one Telegram chat.
pub struct TelegramSink {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramSink {
    pub fn new(bot: Bot, chat_id: i64) -> Self {
        Self {
            bot,
            chat_id: ChatId(chat_id),
        }
    }

    /// Build the bot and make sure the token is accepted before anything is polled.
    pub async fn connect(token: &str, chat_id: i64) -> Result<Self> {
        let bot = Bot::new(token);
        let me = bot.get_me().await?;
        info!("Bot session established as @{}", me.username());
        Ok(Self::new(bot, chat_id))
    }
}

#[async_trait]
impl MessageSink for TelegramSink {
    fn destination(&self) -> String {
        self.chat_id.to_string()
    }

    async fn deliver(&self, payload: &DeliveryPayload) -> Result<()> {
        let photo = InputFile::url(Url::parse(&payload.image_url)?);
        self.bot
            .send_photo(self.chat_id, photo)
            .caption(payload.caption.clone())
            .parse_mode(ParseMode::MarkdownV2)
            .await?;
        Ok(())
    }
}
