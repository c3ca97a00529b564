//! Turns chat events into replies.
//!
//! A pasted link produces a picker listing the other enabled platforms. Each
//! picker button carries a [`ConversionToken`] holding everything needed to
//! run the conversion, so no state is kept between the two steps.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::{
    common::errors::SourceResult,
    configs::AppleMusicConfig,
    matching::find_match,
    protocol::{
        ChatId, ConversionToken, EntityType, IncomingEvent, InlineButton, LinkParser, Platform,
        Reply, Storefront, join_storefront, split_storefront,
    },
    sources::SourceManager,
};

pub const NO_LINK_FOUND: &str = "no supported link found";
pub const INVALID_LINK: &str = "link is invalid";
pub const REGION_PROMPT: &str = "Open in another region:";

pub fn not_found(kind: EntityType, platform: Platform) -> String {
    format!("{} not found in {}", kind, platform)
}

pub struct Resolver {
    sources: Arc<SourceManager>,
    links: LinkParser,
    storefronts: Vec<Storefront>,
}

impl Resolver {
    pub fn new(sources: Arc<SourceManager>, storefronts: Vec<Storefront>) -> Self {
        Self {
            sources,
            links: LinkParser::new(),
            storefronts,
        }
    }

    pub fn from_config(sources: Arc<SourceManager>, config: &AppleMusicConfig) -> Self {
        let storefronts = config
            .storefronts
            .iter()
            .filter_map(|code| {
                let storefront = Storefront::parse(code);
                if storefront.is_none() {
                    warn!("Ignoring invalid Apple Music storefront {:?}", code);
                }
                storefront
            })
            .collect();
        Self::new(sources, storefronts)
    }

    pub fn sources(&self) -> &SourceManager {
        &self.sources
    }

    pub fn storefronts(&self) -> &[Storefront] {
        &self.storefronts
    }

    /// Handles one event. Upstream failures are logged and produce no reply.
    pub async fn handle(&self, event: &IncomingEvent) -> Vec<Reply> {
        let result = match event {
            IncomingEvent::Message { sender, text } => self.show_targets(*sender, text).await,
            IncomingEvent::Callback { sender, data } => match ConversionToken::decode(data) {
                Ok(token) => self.run(*sender, token).await,
                Err(e) => {
                    debug!("Ignoring callback {:?} from {}: {}", data, sender, e);
                    Ok(Vec::new())
                }
            },
        };

        result.unwrap_or_else(|e| {
            error!("Failed to handle event from {}: {}", event.sender(), e);
            Vec::new()
        })
    }

    async fn run(&self, to: ChatId, token: ConversionToken) -> SourceResult<Vec<Reply>> {
        match token {
            ConversionToken::Convert {
                kind,
                source,
                identifier,
                target,
            } => self.convert(to, kind, source, &identifier, target).await,
            ConversionToken::SelectRegion {
                kind,
                identifier,
                storefront,
            } => self.select_region(to, kind, &identifier, &storefront).await,
        }
    }

    /// Replies with the source entity and one button per other enabled platform.
    pub async fn show_targets(&self, to: ChatId, text: &str) -> SourceResult<Vec<Reply>> {
        let Some(link) = self.links.parse(text) else {
            return Ok(vec![Reply::text(to, NO_LINK_FOUND)]);
        };
        let Some(source) = self.sources.get(link.platform) else {
            debug!("{} link received but the source is disabled", link.platform);
            return Ok(vec![Reply::text(to, NO_LINK_FOUND)]);
        };

        let Some(entity) = source.get(link.kind, &link.identifier).await? else {
            return Ok(vec![Reply::text(to, INVALID_LINK)]);
        };

        let buttons = self
            .sources
            .platforms()
            .into_iter()
            .filter(|p| *p != link.platform)
            .filter_map(|target| {
                let token = ConversionToken::Convert {
                    kind: link.kind,
                    source: link.platform,
                    identifier: link.identifier.clone(),
                    target,
                };
                button(target.display_name(), &token)
            })
            .collect();

        let text = format!("{} - {}", entity.artist_name(), entity.name());
        Ok(vec![Reply::with_buttons(to, text, buttons)])
    }

    pub async fn convert(
        &self,
        to: ChatId,
        kind: EntityType,
        source: Platform,
        identifier: &str,
        target: Platform,
    ) -> SourceResult<Vec<Reply>> {
        let (Some(source_client), Some(target_client)) =
            (self.sources.get(source), self.sources.get(target))
        else {
            debug!("Conversion {} -> {} involves a disabled source", source, target);
            return Ok(Vec::new());
        };

        let Some(entity) = source_client.get(kind, identifier).await? else {
            debug!("{} {} {} no longer resolves", source, kind, identifier);
            return Ok(Vec::new());
        };

        let Some(found) = find_match(&entity, target_client, kind).await? else {
            return Ok(vec![Reply::text(to, not_found(kind, target))]);
        };

        let mut replies = vec![Reply::text(to, found.url())];
        if target == Platform::Apple {
            if let Some(regions) = self.region_picker(to, kind, found.id()) {
                replies.push(regions);
            }
        }
        Ok(replies)
    }

    fn region_picker(&self, to: ChatId, kind: EntityType, identifier: &str) -> Option<Reply> {
        let (_, raw_id) = split_storefront(identifier);
        let buttons: Vec<InlineButton> = self
            .storefronts
            .iter()
            .filter_map(|storefront| {
                let token = ConversionToken::SelectRegion {
                    kind,
                    identifier: raw_id.to_string(),
                    storefront: storefront.clone(),
                };
                button(&storefront.as_str().to_uppercase(), &token)
            })
            .collect();

        (!buttons.is_empty()).then(|| Reply::with_buttons(to, REGION_PROMPT, buttons))
    }

    pub async fn select_region(
        &self,
        to: ChatId,
        kind: EntityType,
        identifier: &str,
        storefront: &Storefront,
    ) -> SourceResult<Vec<Reply>> {
        let Some(apple) = self.sources.get(Platform::Apple) else {
            return Ok(Vec::new());
        };

        let located = join_storefront(storefront, identifier);
        let reply = match apple.get(kind, &located).await? {
            Some(entity) => Reply::text(to, entity.url()),
            None => Reply::text(to, not_found(kind, Platform::Apple)),
        };
        Ok(vec![reply])
    }
}

fn button(text: &str, token: &ConversionToken) -> Option<InlineButton> {
    match token.encode() {
        Ok(callback_data) => Some(InlineButton {
            text: text.to_string(),
            callback_data,
        }),
        Err(e) => {
            warn!("Skipping button {:?}: {}", text, e);
            None
        }
    }
}
