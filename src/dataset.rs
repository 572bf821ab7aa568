use crate::dto::RecordSchema;
use crate::error::ServiceError;
use crate::record::Record;
use rustc_hash::FxHashMap;

/// An ordered, read-only collection of records with stable id lookup.
/// Ids are unique; a collision is fatal since every downstream structure
/// is keyed by id.
#[derive(Debug)]
pub struct Dataset {
    name: String,
    records: Vec<Record>,
    by_id: FxHashMap<String, usize>,
    skipped: usize,
}

impl Dataset {
    /// Streaming decode of a line-delimited JSON file. Lines that fail to
    /// decode into a record are skipped and counted rather than aborting
    /// the run; the caller reports the count.
    pub fn from_json_lines(
        name: &str,
        bytes: &[u8],
        schema: &RecordSchema,
    ) -> Result<Dataset, ServiceError> {
        let text = std::str::from_utf8(bytes).map_err(ServiceError::source_format)?;
        let mut records = Vec::new();
        let mut skipped = 0usize;
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let parsed = serde_json::from_str::<serde_json::Value>(line)
                .map_err(ServiceError::source_format)
                .and_then(|raw| Record::from_raw(&raw, schema));
            match parsed {
                Ok(record) => records.push(record),
                Err(_) => skipped += 1,
            }
        }
        let mut dataset = Self::from_records(name, records)?;
        dataset.skipped = skipped;
        Ok(dataset)
    }

    /// Rebuilds a dataset from previously materialized records, e.g. the
    /// store object the block service wrote. Semantics are identical to the
    /// freshly parsed form.
    pub fn from_records(name: &str, records: Vec<Record>) -> Result<Dataset, ServiceError> {
        let mut by_id =
            FxHashMap::with_capacity_and_hasher(records.len(), Default::default());
        for (idx, record) in records.iter().enumerate() {
            if by_id.insert(record.id.clone(), idx).is_some() {
                return Err(ServiceError::identity_collision(name, &record.id));
            }
        }
        Ok(Dataset {
            name: name.to_owned(),
            records,
            by_id,
            skipped: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.by_id.get(id).map(|&idx| &self.records[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Lines dropped during ingestion.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// The persistence view: records in input order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }
}
