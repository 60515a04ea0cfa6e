//! # Smite: Test Registry
//!
//! Growable, ordered, append-only collection of test descriptors. Insertion
//! order is both execution order and report order.
//!
//! Registry Invariant: `len() <= capacity()` at all times. Capacity grows by a
//! fixed increment (the initial capacity) each time an append crosses the
//! boundary, and every growth preserves the previously appended descriptors.

use serde::Serialize;
use tracing::debug;

use crate::assertions::TestResult;
use crate::errors::{ErrorKind, HarnessError};

/// Number of descriptors a fresh registry holds before its first growth.
pub const DEFAULT_CAPACITY: usize = 100;

/// An invocable test body.
pub type TestBody = Box<dyn FnMut() -> TestResult>;

/// Failure information recorded on a descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedError {
    pub kind: ErrorKind,
    pub line: u32,
    pub detail: String,
}

/// One registered test case and its latest outcome.
pub struct TestDescriptor {
    pub(crate) body: TestBody,
    pub file: String,
    pub name: String,
    pub line: u32,
    pub failed: bool,
    pub error: Option<RecordedError>,
}

impl TestDescriptor {
    pub fn new(
        body: TestBody,
        name: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            body,
            file: file.into(),
            name: name.into(),
            line,
            failed: false,
            error: None,
        }
    }

    /// Snapshot without the body, for reporters and summaries.
    pub fn record(&self) -> TestRecord {
        TestRecord {
            file: self.file.clone(),
            name: self.name.clone(),
            line: self.line,
            failed: self.failed,
            error: self.error.clone(),
        }
    }
}

impl std::fmt::Debug for TestDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestDescriptor")
            .field("file", &self.file)
            .field("name", &self.name)
            .field("line", &self.line)
            .field("failed", &self.failed)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// Serializable view of a descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestRecord {
    pub file: String,
    pub name: String,
    pub line: u32,
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RecordedError>,
}

impl TestRecord {
    /// `file::name`, as printed by the console reporter.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.file, self.name)
    }
}

#[derive(Debug)]
pub struct Registry {
    tests: Vec<TestDescriptor>,
    capacity: usize,
    increment: usize,
    growth_events: usize,
}

impl Registry {
    pub fn new() -> Result<Self, HarnessError> {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty registry whose capacity, and growth increment, is
    /// `capacity`.
    pub fn with_capacity(capacity: usize) -> Result<Self, HarnessError> {
        if capacity == 0 {
            return Err(HarnessError::InvalidCapacity);
        }
        let mut tests = Vec::new();
        reserve_to(&mut tests, capacity)?;
        Ok(Self {
            tests,
            capacity,
            increment: capacity,
            growth_events: 0,
        })
    }

    /// Appends a descriptor, growing by one increment if the append crosses
    /// the current capacity.
    pub fn add(&mut self, descriptor: TestDescriptor) -> Result<(), HarnessError> {
        if self.tests.len() == self.capacity {
            self.grow()?;
        }
        self.tests.push(descriptor);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn growth_events(&self) -> usize {
        self.growth_events
    }

    pub fn get(&self, index: usize) -> Option<&TestDescriptor> {
        self.tests.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut TestDescriptor> {
        self.tests.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestDescriptor> {
        self.tests.iter()
    }

    pub fn records(&self) -> Vec<TestRecord> {
        self.tests.iter().map(TestDescriptor::record).collect()
    }

    /// Drops every descriptor and frees the backing storage.
    pub fn release(&mut self) {
        self.tests = Vec::new();
        self.capacity = 0;
    }

    fn grow(&mut self) -> Result<(), HarnessError> {
        let requested = self.capacity + self.increment;
        reserve_to(&mut self.tests, requested)?;
        self.capacity = requested;
        self.growth_events += 1;
        debug!(capacity = requested, "grew test registry");
        Ok(())
    }
}

fn reserve_to(tests: &mut Vec<TestDescriptor>, capacity: usize) -> Result<(), HarnessError> {
    let additional = capacity.saturating_sub(tests.len());
    tests
        .try_reserve_exact(additional)
        .map_err(|source| HarnessError::Allocation {
            requested: capacity,
            source,
        })
}
