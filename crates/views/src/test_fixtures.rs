use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::collab::{DataSource, LogSource, SourceError};
use crate::context::ViewContext;
use crate::kinds::modules::{DEFAULT_MODULE_SUFFIX, ModuleDirectory};
use crate::row::{Row, row};

/// Context over a module directory that does not exist.
pub(crate) fn context() -> ViewContext {
	context_in(Path::new("/nonexistent/strata-views/modules"))
}

pub(crate) fn context_in(dir: &Path) -> ViewContext {
	ViewContext::new(ModuleDirectory::new(dir, DEFAULT_MODULE_SUFFIX))
}

pub(crate) struct StaticLogs(pub Vec<Row>);

impl LogSource for StaticLogs {
	fn logs(&self) -> Vec<Row> {
		self.0.clone()
	}
}

/// What a [`CountingSource`] answers.
#[derive(Clone, Copy)]
pub(crate) enum Answer {
	Rows,
	Nothing,
	Fail,
}

/// Data source that counts queries and answers with a fixed outcome.
pub(crate) struct CountingSource {
	pub identity: &'static str,
	pub answer: Answer,
	pub row_calls: AtomicUsize,
	pub field_calls: AtomicUsize,
}

impl CountingSource {
	pub(crate) fn new(identity: &'static str, answer: Answer) -> Arc<Self> {
		Arc::new(Self {
			identity,
			answer,
			row_calls: AtomicUsize::new(0),
			field_calls: AtomicUsize::new(0),
		})
	}

	pub(crate) fn row_calls(&self) -> usize {
		self.row_calls.load(Ordering::SeqCst)
	}

	fn respond(&self, rows: Vec<Row>) -> Result<Option<Vec<Row>>, SourceError> {
		match self.answer {
			Answer::Rows => Ok(Some(rows)),
			Answer::Nothing => Ok(None),
			Answer::Fail => Err("connection reset".into()),
		}
	}
}

impl DataSource for CountingSource {
	fn identity(&self) -> &str {
		self.identity
	}

	fn rows(&self, filter: Option<&str>, fields: Option<&[String]>) -> Result<Option<Vec<Row>>, SourceError> {
		self.row_calls.fetch_add(1, Ordering::SeqCst);
		let echo = row([
			("filter", filter.map_or(Value::Null, Value::from)),
			("fields", fields.map_or(Value::Null, |f| Value::from(f.join(",")))),
		]);
		self.respond(vec![echo])
	}

	fn fields(&self, detailed: bool) -> Result<Option<Vec<Row>>, SourceError> {
		self.field_calls.fetch_add(1, Ordering::SeqCst);
		self.respond(vec![row([("name", Value::from("id")), ("detailed", Value::from(detailed))])])
	}
}

/// Data source whose queries block until released.
///
/// Each query reports entry on `entered`, then waits for one release message.
/// Queries after the first `panic_first` calls succeed normally.
pub(crate) struct GatedSource {
	identity: &'static str,
	entered: Mutex<Sender<()>>,
	release: Mutex<Receiver<()>>,
	calls: AtomicUsize,
	panic_first: usize,
}

pub(crate) struct Gate {
	pub entered: Receiver<()>,
	pub release: Sender<()>,
}

impl GatedSource {
	pub(crate) fn new(identity: &'static str, panic_first: usize) -> (Arc<Self>, Gate) {
		let (entered_tx, entered_rx) = mpsc::channel();
		let (release_tx, release_rx) = mpsc::channel();
		let source = Arc::new(Self {
			identity,
			entered: Mutex::new(entered_tx),
			release: Mutex::new(release_rx),
			calls: AtomicUsize::new(0),
			panic_first,
		});
		let gate = Gate {
			entered: entered_rx,
			release: release_tx,
		};
		(source, gate)
	}

	pub(crate) fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

impl DataSource for GatedSource {
	fn identity(&self) -> &str {
		self.identity
	}

	fn rows(&self, _filter: Option<&str>, _fields: Option<&[String]>) -> Result<Option<Vec<Row>>, SourceError> {
		let call = self.calls.fetch_add(1, Ordering::SeqCst);
		let _ = self.entered.lock().unwrap().send(());
		let _ = self.release.lock().unwrap().recv();
		if call < self.panic_first {
			panic!("gated source failed on call {call}");
		}
		Ok(Some(vec![row([("call", call)])]))
	}

	fn fields(&self, _detailed: bool) -> Result<Option<Vec<Row>>, SourceError> {
		Ok(None)
	}
}
