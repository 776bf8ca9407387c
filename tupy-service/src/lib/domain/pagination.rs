use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page must be at least {min}, got {actual}")]
    PageTooLow { min: u32, actual: u32 },

    #[error("page_size must be between {min} and {max}, got {actual}")]
    PageSizeOutOfRange { min: u32, max: u32, actual: u32 },
}

/// Validated, 1-indexed page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    pub const MIN_PAGE: u32 = 1;
    pub const MIN_PAGE_SIZE: u32 = 2;
    pub const MAX_PAGE_SIZE: u32 = 100;
    pub const DEFAULT_PAGE_SIZE: u32 = 20;

    /// # Errors
    /// * `PageTooLow` - `page` is 0
    /// * `PageSizeOutOfRange` - `page_size` outside 2..=100
    pub fn new(page: u32, page_size: u32) -> Result<Self, PaginationError> {
        if page < Self::MIN_PAGE {
            return Err(PaginationError::PageTooLow {
                min: Self::MIN_PAGE,
                actual: page,
            });
        }
        if !(Self::MIN_PAGE_SIZE..=Self::MAX_PAGE_SIZE).contains(&page_size) {
            return Err(PaginationError::PageSizeOutOfRange {
                min: Self::MIN_PAGE_SIZE,
                max: Self::MAX_PAGE_SIZE,
                actual: page_size,
            });
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Rows to skip: `(page - 1) * page_size`.
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: Self::MIN_PAGE,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the full-table count taken in the same session.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            page_size: request.page_size(),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_is_zero_based() {
        let first = PageRequest::new(1, 20).unwrap();
        let third = PageRequest::new(3, 20).unwrap();

        assert_eq!(first.offset(), 0);
        assert_eq!(third.offset(), 40);
        assert_eq!(third.limit(), 20);
    }

    #[test]
    fn test_bounds() {
        assert_eq!(
            PageRequest::new(0, 20),
            Err(PaginationError::PageTooLow { min: 1, actual: 0 })
        );
        assert!(PageRequest::new(1, 1).is_err());
        assert!(PageRequest::new(1, 2).is_ok());
        assert!(PageRequest::new(1, 100).is_ok());
        assert!(PageRequest::new(1, 101).is_err());
    }

    #[test]
    fn test_pages_partition_rows() {
        // Slicing by offset/limit over a stable dataset covers each row exactly once.
        let rows: Vec<i64> = (1..=47).collect();

        for page_size in [2u32, 5, 20, 47, 100] {
            let mut seen = Vec::new();
            let mut page = 1;
            loop {
                let request = PageRequest::new(page, page_size).unwrap();
                let slice: Vec<i64> = rows
                    .iter()
                    .skip(request.offset() as usize)
                    .take(request.limit() as usize)
                    .copied()
                    .collect();
                if slice.is_empty() {
                    break;
                }
                seen.extend(slice);
                page += 1;
            }
            assert_eq!(seen, rows, "page_size {page_size}");
        }
    }

    #[test]
    fn test_page_map_keeps_metadata() {
        let page = Page::new(vec![1, 2], 9, PageRequest::new(2, 2).unwrap());
        let mapped = page.map(|n| n * 10);

        assert_eq!(mapped.items, vec![10, 20]);
        assert_eq!(mapped.total, 9);
        assert_eq!(mapped.page, 2);
        assert_eq!(mapped.page_size, 2);
    }
}
