use serde::{Deserialize, Serialize};

/// Chat the event came from and replies go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An event delivered by the chat transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum IncomingEvent {
    Message { sender: ChatId, text: String },
    Callback { sender: ChatId, data: String },
}

impl IncomingEvent {
    pub fn sender(&self) -> ChatId {
        match self {
            IncomingEvent::Message { sender, .. } | IncomingEvent::Callback { sender, .. } => {
                *sender
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineButton {
    pub text: String,
    pub callback_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rows", rename_all = "camelCase")]
pub enum ReplyMarkup {
    InlineKeyboard(Vec<Vec<InlineButton>>),
    ReplyKeyboard(Vec<Vec<String>>),
}

/// A message the transport should deliver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub to: ChatId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
}

impl Reply {
    pub fn text(to: ChatId, text: impl Into<String>) -> Self {
        Self {
            to,
            text: text.into(),
            reply_markup: None,
        }
    }

    /// One button per row.
    pub fn with_buttons(to: ChatId, text: impl Into<String>, buttons: Vec<InlineButton>) -> Self {
        Self {
            to,
            text: text.into(),
            reply_markup: Some(ReplyMarkup::InlineKeyboard(
                buttons.into_iter().map(|b| vec![b]).collect(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_event_deserialization() {
        let event: IncomingEvent = serde_json::from_value(json!({
            "type": "callback",
            "sender": 1001,
            "data": "cnvtr/ap/724466660/sf"
        }))
        .unwrap();

        assert_eq!(event.sender(), ChatId(1001));
        assert_eq!(
            event,
            IncomingEvent::Callback {
                sender: ChatId(1001),
                data: "cnvtr/ap/724466660/sf".to_string()
            }
        );
    }

    #[test]
    fn test_reply_serialization() {
        let reply = Reply::with_buttons(
            ChatId(7),
            "pick one",
            vec![InlineButton {
                text: "Spotify".to_string(),
                callback_data: "cnvtr/ap/1/sf".to_string(),
            }],
        );

        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({
                "to": 7,
                "text": "pick one",
                "replyMarkup": {
                    "kind": "inlineKeyboard",
                    "rows": [[{ "text": "Spotify", "callbackData": "cnvtr/ap/1/sf" }]]
                }
            })
        );

        let plain = serde_json::to_value(Reply::text(ChatId(7), "hi")).unwrap();
        assert_eq!(plain, json!({ "to": 7, "text": "hi" }));
    }

    #[test]
    fn test_reply_keyboard_shape() {
        let markup = ReplyMarkup::ReplyKeyboard(vec![vec!["/start".to_string()]]);
        assert_eq!(
            serde_json::to_value(&markup).unwrap(),
            json!({ "kind": "replyKeyboard", "rows": [["/start"]] })
        );
    }
}
