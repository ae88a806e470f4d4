//! Test doubles and common utilities for reconciliation contract tests
//!
//! The fake provider keeps records in memory so consecutive runs observe
//! each other's writes, and counts every call so tests can assert on the
//! exact number of mutations.

#![allow(dead_code)]

use recsync_core::error::{Error, Result};
use recsync_core::reconcile::DesiredRecord;
use recsync_core::traits::{DnsProvider, DnsRecord};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Which provider call should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    ZoneLookup,
    Fetch,
    Create,
    Update,
}

/// A mutating call observed by the fake provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create { zone_id: String, record: DnsRecord },
    Update { zone_id: String, record: DnsRecord },
}

/// In-memory DnsProvider that tracks calls
#[derive(Clone)]
pub struct FakeDnsProvider {
    /// zone name -> zone id
    zones: Arc<Mutex<HashMap<String, String>>>,
    /// (zone id, record name) -> record
    records: Arc<Mutex<HashMap<(String, String), DnsRecord>>>,
    /// Mutations in call order
    mutations: Arc<Mutex<Vec<Mutation>>>,
    /// Call counter for zone_id()
    zone_call_count: Arc<AtomicUsize>,
    /// Call counter for get_record()
    fetch_call_count: Arc<AtomicUsize>,
    /// Injected failure
    fail_on: Option<FailOn>,
    next_id: Arc<AtomicUsize>,
}

impl FakeDnsProvider {
    pub fn new() -> Self {
        Self {
            zones: Arc::new(Mutex::new(HashMap::new())),
            records: Arc::new(Mutex::new(HashMap::new())),
            mutations: Arc::new(Mutex::new(Vec::new())),
            zone_call_count: Arc::new(AtomicUsize::new(0)),
            fetch_call_count: Arc::new(AtomicUsize::new(0)),
            fail_on: None,
            next_id: Arc::new(AtomicUsize::new(1)),
        }
    }

    /// Register a zone
    pub fn with_zone(self, name: &str, id: &str) -> Self {
        self.zones
            .lock()
            .unwrap()
            .insert(name.to_string(), id.to_string());
        self
    }

    /// Seed an existing record
    pub fn with_record(self, zone_id: &str, record: DnsRecord) -> Self {
        self.records
            .lock()
            .unwrap()
            .insert((zone_id.to_string(), record.name.clone()), record);
        self
    }

    /// Make one kind of call fail with a transport error
    pub fn failing_on(mut self, fail_on: FailOn) -> Self {
        self.fail_on = Some(fail_on);
        self
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.mutations.lock().unwrap().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.mutations.lock().unwrap().len()
    }

    pub fn zone_call_count(&self) -> usize {
        self.zone_call_count.load(Ordering::SeqCst)
    }

    pub fn fetch_call_count(&self) -> usize {
        self.fetch_call_count.load(Ordering::SeqCst)
    }

    /// Current stored record
    pub fn record(&self, zone_id: &str, name: &str) -> Option<DnsRecord> {
        self.records
            .lock()
            .unwrap()
            .get(&(zone_id.to_string(), name.to_string()))
            .cloned()
    }

    fn fail_if(&self, on: FailOn) -> Result<()> {
        if self.fail_on == Some(on) {
            return Err(Error::transport("connection refused"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DnsProvider for FakeDnsProvider {
    async fn zone_id(&self, zone_name: &str) -> Result<String> {
        self.zone_call_count.fetch_add(1, Ordering::SeqCst);
        self.fail_if(FailOn::ZoneLookup)?;

        self.zones
            .lock()
            .unwrap()
            .get(zone_name)
            .cloned()
            .ok_or_else(|| Error::zone_not_found(zone_name))
    }

    async fn get_record(&self, zone_id: &str, name: &str) -> Result<Option<DnsRecord>> {
        self.fetch_call_count.fetch_add(1, Ordering::SeqCst);
        self.fail_if(FailOn::Fetch)?;
        Ok(self.record(zone_id, name))
    }

    async fn create_record(&self, zone_id: &str, record: &DnsRecord) -> Result<()> {
        self.mutations.lock().unwrap().push(Mutation::Create {
            zone_id: zone_id.to_string(),
            record: record.clone(),
        });
        self.fail_if(FailOn::Create)?;

        let id = format!("rec-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let stored = DnsRecord {
            id: Some(id),
            ..record.clone()
        };
        self.records
            .lock()
            .unwrap()
            .insert((zone_id.to_string(), record.name.clone()), stored);
        Ok(())
    }

    async fn update_record(&self, zone_id: &str, record: &DnsRecord) -> Result<()> {
        self.mutations.lock().unwrap().push(Mutation::Update {
            zone_id: zone_id.to_string(),
            record: record.clone(),
        });
        self.fail_if(FailOn::Update)?;

        let mut records = self.records.lock().unwrap();
        let key = (zone_id.to_string(), record.name.clone());
        let stored = records
            .get_mut(&key)
            .ok_or_else(|| Error::rejected(404, "record not found"))?;
        if stored.id != record.id {
            return Err(Error::rejected(404, "record id mismatch"));
        }
        // Annotation is not part of an update
        stored.record_type = record.record_type.clone();
        stored.content = record.content.clone();
        stored.ttl = record.ttl;
        stored.proxied = record.proxied;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// Desired CNAME with the fixed defaults
pub fn desired(name: &str, content: &str) -> DesiredRecord {
    recsync_core::SyncConfig::new("test-token", name, content).desired_record()
}

/// An existing record as the provider would return it
pub fn existing_record(id: &str, name: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: Some(id.to_string()),
        name: name.to_string(),
        record_type: "CNAME".to_string(),
        content: content.to_string(),
        ttl: 3600,
        proxied: true,
        comment: Some("c".to_string()),
    }
}
