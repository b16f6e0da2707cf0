use comanda::{
    Driver, Error, Executor, GenericSqlWriter, Result, RowLabeled, Statement,
    future::TryFutureExt,
    stream::{self, Stream},
};
use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

pub type Responder = Arc<dyn Fn(&Statement) -> Result<Vec<RowLabeled>> + Send + Sync>;

#[derive(Default, Debug, Clone, Copy)]
pub struct MockDriver;

impl Driver for MockDriver {
    type SqlWriter = GenericSqlWriter;

    const NAME: &'static str = "mock";

    fn sql_writer(&self) -> GenericSqlWriter {
        GenericSqlWriter
    }
}

/// In memory executor recording every statement it receives.
///
/// Clones share the recorded statements and the responder, keep one clone around to
/// inspect what a client executed.
#[derive(Clone)]
pub struct MockExecutor {
    driver: MockDriver,
    statements: Arc<Mutex<Vec<Statement>>>,
    responder: Arc<Mutex<Responder>>,
    delay: Duration,
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExecutor {
    /// Answers every statement with no rows.
    pub fn new() -> Self {
        Self {
            driver: MockDriver,
            statements: Default::default(),
            responder: Arc::new(Mutex::new(Arc::new(|_| Ok(Vec::new())))),
            delay: Duration::ZERO,
        }
    }

    pub fn with_responder(
        self,
        responder: impl Fn(&Statement) -> Result<Vec<RowLabeled>> + Send + Sync + 'static,
    ) -> Self {
        self.respond(responder);
        self
    }

    /// Every statement waits `delay` before being answered.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Replaces the responder, statements already waiting use the new one.
    pub fn respond(
        &self,
        responder: impl Fn(&Statement) -> Result<Vec<RowLabeled>> + Send + Sync + 'static,
    ) {
        *self.responder.lock().unwrap_or_else(PoisonError::into_inner) = Arc::new(responder);
    }

    /// Answers every statement with an error.
    pub fn fail(&self, message: &'static str) {
        self.respond(move |_| Err(Error::msg(message)));
    }

    /// Statements received so far, in order of arrival.
    pub fn statements(&self) -> Vec<Statement> {
        self.statements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, predicate: impl Fn(&Statement) -> bool) -> usize {
        self.statements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|v| predicate(v))
            .count()
    }

    pub fn clear(&self) {
        self.statements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Executor for MockExecutor {
    type Driver = MockDriver;

    fn driver(&self) -> &MockDriver {
        &self.driver
    }

    fn fetch(&self, statement: Statement) -> impl Stream<Item = Result<RowLabeled>> + Send {
        let statements = self.statements.clone();
        let responder = self.responder.clone();
        let delay = self.delay;
        async move {
            statements
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(statement.clone());
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let responder = responder
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            responder(&statement)
        }
        .map_ok(|rows| stream::iter(rows.into_iter().map(Ok::<_, Error>)))
        .try_flatten_stream()
    }
}
