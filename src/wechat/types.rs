use serde::{Deserialize, Serialize};

use crate::report::{MessageKind, RenderedMessage};

/// Group-bot request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "msgtype", rename_all = "lowercase")]
pub enum Envelope {
    Markdown { markdown: Content },
    Text { text: Content },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub content: String,
    pub mentioned_list: Vec<String>,
}

impl From<&RenderedMessage> for Envelope {
    fn from(message: &RenderedMessage) -> Self {
        let content = Content {
            content: message.body.clone(),
            mentioned_list: message.mentions.clone(),
        };

        match message.kind {
            MessageKind::Markdown => Envelope::Markdown { markdown: content },
            MessageKind::Text => Envelope::Text { text: content },
        }
    }
}

/// Group-bot response; a non-zero `errcode` means the message was rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotResponse {
    #[serde(default)]
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: String,
}
