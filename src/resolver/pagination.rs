/// hard ceiling on rows per page, whatever the caller asks
pub const MAX_PAGE_SIZE: i32 = 100;

pub const DEFAULT_PAGE: i32 = 1;
pub const DEFAULT_PAGE_SIZE: i32 = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pagination {
    page: i32,
    page_size: i32,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination { page: DEFAULT_PAGE, page_size: DEFAULT_PAGE_SIZE }
    }
}

impl Pagination {
    /// normalizes any page and page size into a valid window
    pub fn new(page: i32, page_size: i32) -> Self {
        Pagination { page: page.max(1), page_size: page_size.clamp(1, MAX_PAGE_SIZE) }
    }

    pub fn page(&self) -> i32 {
        self.page
    }

    pub fn page_size(&self) -> i32 {
        self.page_size
    }

    pub fn limit(&self) -> u64 {
        self.page_size as u64
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.page_size as u64)
    }
}
