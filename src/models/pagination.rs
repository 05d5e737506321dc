use serde::{Deserialize, Serialize};

/// ページ指定
///
/// `page` は 1 始まり。1 未満は 1 として扱う。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.per_page)
    }
}

/// ページングのメタ情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: i64,
    pub last_page: i64,
    pub current_page: i64,
    pub per_page: i64,
    pub prev: Option<i64>,
    pub next: Option<i64>,
}

impl PageMeta {
    pub fn new(total: i64, request: &PageRequest) -> Self {
        let per_page = i64::from(request.per_page.max(1));
        let current_page = i64::from(request.page);
        let last_page = (total + per_page - 1) / per_page;

        Self {
            total,
            last_page,
            current_page,
            per_page,
            prev: (current_page > 1).then(|| current_page - 1),
            next: (current_page < last_page).then(|| current_page + 1),
        }
    }
}

/// ページング済みの一覧
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_below_one_is_clamped() {
        let request = PageRequest::new(0, 2);
        assert_eq!(request.page, 1);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_offset_for_third_page() {
        let request = PageRequest::new(3, 2);
        assert_eq!(request.offset(), 4);
        assert_eq!(request.limit(), 2);
    }

    #[test]
    fn test_meta_first_page_of_five() {
        let meta = PageMeta::new(5, &PageRequest::new(1, 2));
        assert_eq!(meta.last_page, 3);
        assert_eq!(meta.prev, None);
        assert_eq!(meta.next, Some(2));
    }

    #[test]
    fn test_meta_last_page_has_no_next() {
        let meta = PageMeta::new(5, &PageRequest::new(3, 2));
        assert_eq!(meta.prev, Some(2));
        assert_eq!(meta.next, None);
    }

    #[test]
    fn test_meta_empty_table() {
        let meta = PageMeta::new(0, &PageRequest::new(1, 2));
        assert_eq!(meta.last_page, 0);
        assert_eq!(meta.next, None);
    }
}
