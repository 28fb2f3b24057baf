use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod access;
mod birthdays;
mod contributions;
mod gifts;
mod users;

pub use access::BirthdayRole;
pub use birthdays::{BirthdayDetail, BirthdaySummary};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Tunables threaded into the engine instead of constants buried in ops code.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    /// How far ahead the generator and the upcoming list look, in months.
    pub lookahead_months: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { lookahead_months: 2 }
    }
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    config: EngineConfig,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidOperation(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    config: Option<EngineConfig>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the default configuration.
    pub fn config(mut self, config: EngineConfig) -> EngineBuilder {
        self.config = Some(config);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            config: self.config.unwrap_or_default(),
        })
    }
}
