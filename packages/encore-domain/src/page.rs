#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageReject {
	PageOutOfRange,
	PerPageOutOfRange,
}

/// A validated pagination window. Out-of-range values are rejected at
/// construction, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
	pub page: u32,
	pub per_page: u32,
}
impl PageRequest {
	pub fn new(page: u32, per_page: u32, max_per_page: u32) -> Result<Self, PageReject> {
		if page < 1 {
			return Err(PageReject::PageOutOfRange);
		}
		if per_page < 1 || per_page > max_per_page {
			return Err(PageReject::PerPageOutOfRange);
		}

		Ok(Self { page, per_page })
	}

	pub fn take_page<T>(&self, items: Vec<T>) -> Vec<T> {
		let start = (self.page as usize - 1) * self.per_page as usize;

		items.into_iter().skip(start).take(self.per_page as usize).collect()
	}

	pub fn has_more(&self, total: usize) -> bool {
		(self.page as usize) * (self.per_page as usize) < total
	}
}
