use std::collections::HashMap;

use crate::errors::{AppError, AppResult};
use crate::models::Channel;

/// Immutable lookup over the published catalog
///
/// Keeps the published order for listing. Lookups by id return the first
/// channel carrying that id, matching the single-source catalog which may
/// hold duplicates.
#[derive(Debug, Default)]
pub struct ChannelDirectory {
    channels: Vec<Channel>,
    index: HashMap<String, usize>,
}

impl ChannelDirectory {
    pub fn new(channels: Vec<Channel>) -> Self {
        let mut index = HashMap::with_capacity(channels.len());
        for (position, channel) in channels.iter().enumerate() {
            index.entry(channel.id.clone()).or_insert(position);
        }
        Self { channels, index }
    }

    pub fn all(&self) -> &[Channel] {
        &self.channels
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Channel> {
        self.index.get(id).map(|&position| &self.channels[position])
    }

    pub fn require(&self, id: &str) -> AppResult<&Channel> {
        self.get(id).ok_or_else(|| AppError::not_found("channel", id))
    }
}
