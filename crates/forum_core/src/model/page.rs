//! Post pagination windows.
//!
//! Posts in a topic are numbered from 1 in ascending id order. Page `0`
//! selects every post; page `n` selects posts `10*(n-1)+1 ..= 10*n`.

/// Number of posts on one topic page.
pub const POSTS_PER_PAGE: u32 = 10;

/// Slice of a topic's posts selected by a page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostWindow {
    /// Number of posts skipped before the window.
    pub offset: i64,
    /// Maximum posts in the window; `None` means unbounded.
    pub limit: Option<i64>,
}

impl PostWindow {
    pub fn for_page(page: u32) -> Self {
        if page == 0 {
            return Self {
                offset: 0,
                limit: None,
            };
        }

        let per_page = i64::from(POSTS_PER_PAGE);
        Self {
            offset: (i64::from(page) - 1) * per_page,
            limit: Some(per_page),
        }
    }

    /// Returns whether this window covers the whole topic.
    pub fn is_unbounded(&self) -> bool {
        self.limit.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::PostWindow;

    #[test]
    fn page_zero_selects_everything() {
        let window = PostWindow::for_page(0);
        assert!(window.is_unbounded());
        assert_eq!(window.offset, 0);
    }

    #[test]
    fn numbered_pages_select_ten_posts() {
        assert_eq!(PostWindow::for_page(1).offset, 0);
        assert_eq!(PostWindow::for_page(2).offset, 10);
        assert_eq!(PostWindow::for_page(2).limit, Some(10));
    }

    #[test]
    fn largest_page_does_not_overflow() {
        let window = PostWindow::for_page(u32::MAX);
        assert_eq!(window.offset, (i64::from(u32::MAX) - 1) * 10);
    }
}
