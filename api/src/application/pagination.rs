use crate::application::error::AppError;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub offset: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl PageRequest {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Result<Self, AppError> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        let offset = offset.unwrap_or(0);
        let mut problems = Vec::new();
        if !(1..=MAX_LIMIT).contains(&limit) {
            problems.push(format!("limit must be between 1 and {MAX_LIMIT}"));
        }
        if offset < 0 {
            problems.push("offset must be greater than or equal to 0".to_string());
        }
        if problems.is_empty() {
            Ok(Self { limit, offset })
        } else {
            Err(AppError::Validation(problems.join("; ")))
        }
    }

    /// Slices an already ordered in-memory list.
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .cloned()
            .collect()
    }
}
