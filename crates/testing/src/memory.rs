// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Single-threaded, in-memory event-stream runtime.
//!
//! Records piped into a topic are decoded with the serdes the table was
//! consumed with and run through every interposed stage in order. Every
//! state store a record passes writes the serialized row and continues with
//! the row read back from it, the way a persistent store would.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use rowflow_core::{GenericKey, Row};
use rowflow_stream::runtime::{
	BoxedValueTransform, Consumed, Materialized, RecordMetadata, StreamsBuilder, TableHandle,
};
use rowflow_type::Result;

#[derive(Default)]
pub struct MemoryStreams {
	tables: Vec<(String, MemoryTable)>,
}

impl MemoryStreams {
	pub fn new() -> Self {
		Self::default()
	}

	/// Delivers one record to every table reading `topic`
	pub fn pipe(&self, topic: &str, key: &[u8], value: Option<&[u8]>, metadata: &RecordMetadata) -> Result<()> {
		for (_, table) in self.tables.iter().filter(|(t, _)| t == topic) {
			table.process(key, value, metadata)?;
		}
		Ok(())
	}

	/// Finds a state store by name across all tables
	pub fn store(&self, name: &str) -> Option<MemoryStore> {
		self.tables.iter().find_map(|(_, table)| table.store(name))
	}
}

impl StreamsBuilder for MemoryStreams {
	type Table = MemoryTable;

	fn table(&mut self, topic: &str, consumed: Consumed, materialized: Option<Materialized>) -> Result<MemoryTable> {
		let table = MemoryTable::new(consumed, materialized.map(MemoryStore::new));
		self.tables.push((topic.to_string(), table.clone()));
		Ok(table)
	}
}

struct Stage {
	transform: BoxedValueTransform,
	store: Option<MemoryStore>,
}

struct TableInner {
	consumed: Consumed,
	source_store: Option<MemoryStore>,
	stages: Mutex<Vec<Stage>>,
	output: Mutex<Vec<(GenericKey, Option<Row>)>>,
}

/// Handle to a table built on [`MemoryStreams`]; clones share the table
#[derive(Clone)]
pub struct MemoryTable(Arc<TableInner>);

impl MemoryTable {
	fn new(consumed: Consumed, source_store: Option<MemoryStore>) -> Self {
		Self(Arc::new(TableInner {
			consumed,
			source_store,
			stages: Mutex::new(Vec::new()),
			output: Mutex::new(Vec::new()),
		}))
	}

	/// Names of the interposed stages, in order
	pub fn stages(&self) -> Vec<&'static str> {
		self.0.stages.lock().iter().map(|stage| stage.transform.name()).collect()
	}

	/// Names of the state stores, in the order records reach them
	pub fn stores(&self) -> Vec<String> {
		let mut stores: Vec<String> = self.0.source_store.iter().map(|s| s.name().to_string()).collect();
		stores.extend(self.0.stages.lock().iter().filter_map(|s| s.store.as_ref()).map(|s| s.name().to_string()));
		stores
	}

	/// Every emitted record, in processing order
	pub fn output(&self) -> Vec<(GenericKey, Option<Row>)> {
		self.0.output.lock().clone()
	}

	/// The most recently emitted row for `key`, `None` after a tombstone
	pub fn latest(&self, key: &GenericKey) -> Option<Row> {
		self.0.output.lock().iter().rev().find(|(k, _)| k == key).and_then(|(_, row)| row.clone())
	}

	fn store(&self, name: &str) -> Option<MemoryStore> {
		if let Some(store) = self.0.source_store.as_ref().filter(|s| s.name() == name) {
			return Some(store.clone());
		}
		self.0.stages.lock().iter().filter_map(|s| s.store.as_ref()).find(|s| s.name() == name).cloned()
	}

	fn process(&self, key: &[u8], value: Option<&[u8]>, metadata: &RecordMetadata) -> Result<()> {
		let key = self.0.consumed.key_serde.deserialize(key)?;
		let mut row = match value {
			Some(bytes) => Some(self.0.consumed.value_serde.deserialize(bytes)?),
			None => None,
		};

		if let Some(store) = &self.0.source_store {
			row = store.put(&key, row.as_ref())?;
		}

		for stage in self.0.stages.lock().iter() {
			row = stage.transform.transform(&key, row, metadata)?;
			if let Some(store) = &stage.store {
				row = store.put(&key, row.as_ref())?;
			}
		}

		self.0.output.lock().push((key, row));
		Ok(())
	}
}

impl TableHandle for MemoryTable {
	fn transform_values(self, transform: BoxedValueTransform, materialized: Option<Materialized>) -> Result<Self> {
		self.0.stages.lock().push(Stage {
			transform,
			store: materialized.map(MemoryStore::new),
		});
		Ok(self)
	}
}

/// Key-value state store holding serialized keys and rows
#[derive(Clone)]
pub struct MemoryStore {
	materialized: Arc<Materialized>,
	entries: Arc<Mutex<IndexMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryStore {
	fn new(materialized: Materialized) -> Self {
		Self {
			materialized: Arc::new(materialized),
			entries: Arc::new(Mutex::new(IndexMap::new())),
		}
	}

	pub fn name(&self) -> &str {
		&self.materialized.store_name
	}

	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}

	pub fn get(&self, key: &GenericKey) -> Result<Option<Row>> {
		let key = self.materialized.key_serde.serialize(key)?;
		match self.entries.lock().get(&key) {
			Some(bytes) => Ok(Some(self.materialized.value_serde.deserialize(bytes)?)),
			None => Ok(None),
		}
	}

	/// Writes `row`, or deletes on a tombstone, and returns what the store
	/// now holds for `key`
	pub fn put(&self, key: &GenericKey, row: Option<&Row>) -> Result<Option<Row>> {
		let key_bytes = self.materialized.key_serde.serialize(key)?;
		match row {
			Some(row) => {
				let bytes = self.materialized.value_serde.serialize(row)?;
				self.entries.lock().insert(key_bytes, bytes);
			}
			None => {
				self.entries.lock().shift_remove(&key_bytes);
			}
		}
		self.get(key)
	}
}
