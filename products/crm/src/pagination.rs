use crate::error::{CrmError, CrmResult};

pub const DEFAULT_LIMIT: u64 = 50;
pub const MAX_LIMIT: u64 = 200;

/// Offset pagination. No total count is computed; callers stop when a page
/// comes back shorter than `limit`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Page {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// Resolved `(limit, offset)`; limit must be within `1..=200`.
    pub fn resolve(&self) -> CrmResult<(u64, u64)> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(CrmError::validation(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        Ok((limit, self.offset.unwrap_or(0)))
    }
}
