//! Byte ceiling shared by every container entry read during one feed.

use crate::error::BudgetExhausted;
use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};

/// Remaining number of entry bytes a feed may read.
#[derive(Debug)]
pub struct ByteBudget {
    limit: u64,
    consumed: AtomicU64,
}

impl ByteBudget {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            consumed: AtomicU64::new(0),
        }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn consumed(&self) -> u64 {
        self.consumed.load(Ordering::Relaxed)
    }

    /// Record `bytes` as read. Fails once the running total passes the limit.
    pub fn charge(&self, bytes: u64) -> Result<(), BudgetExhausted> {
        let total = self.consumed.fetch_add(bytes, Ordering::Relaxed).saturating_add(bytes);
        if total > self.limit {
            return Err(BudgetExhausted(format!(
                "container entries exceeded the {} byte ceiling",
                self.limit
            )));
        }
        Ok(())
    }

    /// Wrap `inner` so every byte read through it is charged to this budget.
    pub fn meter<R: Read>(&self, inner: R) -> BudgetedReader<'_, R> {
        BudgetedReader { inner, budget: self }
    }
}

/// Reader that charges a [`ByteBudget`] and fails with [`BudgetExhausted`] once it is spent.
pub struct BudgetedReader<'b, R> {
    inner: R,
    budget: &'b ByteBudget,
}

impl<R: Read> Read for BudgetedReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let read = self.inner.read(buf)?;
        self.budget.charge(read as u64).map_err(std::io::Error::other)?;
        Ok(read)
    }
}
