//! Named test case tables.
//!
//! A two-level table maps group names to test case names to test bodies,
//! e.g. `"Endpoint" -> "basic" -> test_endpoint_basic`. Tables are unordered;
//! runners that need an order sort names themselves.

use crate::context::TestContext;
use crate::error::TestResult;
use acctest_sync_semaphore::Semaphore;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;

/// Boxed body of a serial test case.
pub type TestFn = Box<dyn FnOnce(TestContext) -> BoxFuture<'static, TestResult> + Send>;

/// Boxed body of a semaphore-gated test case.
pub type LimitedTestFn =
    Box<dyn FnOnce(TestContext, Semaphore) -> BoxFuture<'static, TestResult> + Send>;

/// Test cases for [`run_serial_tests_1_level`](crate::run_serial_tests_1_level).
pub type SerialCases = TestCases<TestFn>;

/// Groups for [`run_serial_tests_2_levels`](crate::run_serial_tests_2_levels).
pub type SerialGroups = TestGroups<TestFn>;

/// Test cases for
/// [`run_limited_concurrency_tests_1_level`](crate::run_limited_concurrency_tests_1_level).
pub type LimitedCases = TestCases<LimitedTestFn>;

/// Groups for
/// [`run_limited_concurrency_tests_2_levels`](crate::run_limited_concurrency_tests_2_levels).
pub type LimitedGroups = TestGroups<LimitedTestFn>;

/// Test case name to test body.
pub struct TestCases<F> {
    cases: HashMap<String, F>,
}

impl<F> TestCases<F> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            cases: HashMap::new(),
        }
    }

    /// Number of test cases.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns `true` if there are no test cases.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Returns `true` if a test case named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.cases.contains_key(name)
    }

    /// Test case names in lexical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.cases.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Consumes the table, yielding cases in lexical order of name.
    pub fn into_sorted(self) -> Vec<(String, F)> {
        let mut cases: Vec<(String, F)> = self.cases.into_iter().collect();
        cases.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        cases
    }

    fn insert(&mut self, name: String, case: F) {
        assert!(
            !self.cases.contains_key(&name),
            "duplicate test case name {name:?}"
        );
        self.cases.insert(name, case);
    }
}

impl TestCases<TestFn> {
    /// Adds a test case.
    ///
    /// # Panics
    ///
    /// Panics if a case with the same name was already added.
    ///
    /// # Examples
    ///
    /// ```
    /// use acctest_sync_runner::{SerialCases, TestContext, TestResult};
    ///
    /// async fn test_index_basic(t: TestContext) -> TestResult {
    ///     t.log("aws_resourceexplorer2_index created");
    ///     Ok(())
    /// }
    ///
    /// let cases = SerialCases::new()
    ///     .case("basic", test_index_basic)
    ///     .case("disappears", |_t| async { Ok(()) });
    /// assert_eq!(cases.names(), vec!["basic", "disappears"]);
    /// ```
    pub fn case<C, Fut>(mut self, name: impl Into<String>, case: C) -> Self
    where
        C: FnOnce(TestContext) -> Fut + Send + 'static,
        Fut: Future<Output = TestResult> + Send + 'static,
    {
        self.insert(name.into(), Box::new(move |t| Box::pin(case(t))));
        self
    }
}

impl TestCases<LimitedTestFn> {
    /// Adds a semaphore-gated test case.
    ///
    /// The body receives the semaphore and is responsible for acquiring it
    /// around the part that uses the scarce resource.
    ///
    /// # Panics
    ///
    /// Panics if a case with the same name was already added.
    ///
    /// # Examples
    ///
    /// ```
    /// use acctest_sync_runner::{LimitedCases, TestContext, TestResult};
    /// use acctest_sync_semaphore::Semaphore;
    ///
    /// async fn test_route_basic(t: TestContext, semaphore: Semaphore) -> TestResult {
    ///     let _permit = semaphore.acquire().await?;
    ///     t.log("aws_ec2_client_vpn_route created");
    ///     Ok(())
    /// }
    ///
    /// let cases = LimitedCases::new().case("basic", test_route_basic);
    /// assert!(cases.contains("basic"));
    /// ```
    pub fn case<C, Fut>(mut self, name: impl Into<String>, case: C) -> Self
    where
        C: FnOnce(TestContext, Semaphore) -> Fut + Send + 'static,
        Fut: Future<Output = TestResult> + Send + 'static,
    {
        self.insert(
            name.into(),
            Box::new(move |t, semaphore| Box::pin(case(t, semaphore))),
        );
        self
    }
}

impl<F> Default for TestCases<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for TestCases<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCases")
            .field("names", &self.names())
            .finish()
    }
}

/// Group name to test cases.
pub struct TestGroups<F> {
    groups: HashMap<String, TestCases<F>>,
}

impl<F> TestGroups<F> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            groups: HashMap::new(),
        }
    }

    /// Adds a group.
    ///
    /// # Panics
    ///
    /// Panics if a group with the same name was already added.
    pub fn group(mut self, name: impl Into<String>, cases: TestCases<F>) -> Self {
        let name = name.into();
        assert!(
            !self.groups.contains_key(&name),
            "duplicate test group name {name:?}"
        );
        self.groups.insert(name, cases);
        self
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if there are no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of test cases across all groups.
    pub fn case_count(&self) -> usize {
        self.groups.values().map(TestCases::len).sum()
    }

    /// Test cases of the group `name`.
    pub fn get(&self, name: &str) -> Option<&TestCases<F>> {
        self.groups.get(name)
    }

    /// Group names in lexical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Consumes the table, yielding groups in lexical order of name.
    pub fn into_sorted(self) -> Vec<(String, TestCases<F>)> {
        let mut groups: Vec<(String, TestCases<F>)> = self.groups.into_iter().collect();
        groups.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        groups
    }
}

impl<F> Default for TestGroups<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for TestGroups<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.names().into_iter().map(|name| (name, &self.groups[name])))
            .finish()
    }
}
