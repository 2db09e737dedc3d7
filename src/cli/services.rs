//! Services bundled with the CLI
//!
//! - crawler: integer and string fields with a custom validator; skips
//!   pages already crawled during this run
//! - account: a string field extended to accept only `xxx-yyy-zzz` ids
//! - grid: a list of lists of lists of characters

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use clap::ValueEnum;
use serde_json::{json, Value};

use crate::field::{
    CharacterField, Frozen, IntegerField, ListField, StringField, ValidationError,
    ValidationResult,
};
use crate::registry::FieldSet;
use crate::service::{Extras, Interrupt, PreFire, Service};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServiceKind {
    Crawler,
    Account,
    Grid,
}

/// URLs crawled so far, shared by every crawler of one run
pub type CrawlLog = Arc<Mutex<HashSet<String>>>;

fn page_name_validator(name: &str, value: &String) -> ValidationResult<()> {
    if !value.ends_with(".html") {
        return Err(ValidationError::new(name, "I only know html pages!"));
    }
    Ok(())
}

pub struct Crawler {
    user_id: Frozen<i64>,
    page_name: Frozen<String>,
    crawled: CrawlLog,
    url: Option<String>,
}

impl Crawler {
    pub fn new(crawled: CrawlLog) -> Self {
        Self {
            user_id: Frozen::new(),
            page_name: Frozen::new(),
            crawled,
            url: None,
        }
    }

    pub fn user_id(&self) -> &Frozen<i64> {
        &self.user_id
    }

    pub fn page_name(&self) -> &Frozen<String> {
        &self.page_name
    }

    fn url(&self) -> anyhow::Result<String> {
        Ok(format!(
            "http://example.com/{}/{}",
            self.user_id.value()?,
            self.page_name.value()?
        ))
    }
}

impl Service for Crawler {
    type Output = Value;

    fn declare(fields: &mut FieldSet<Self>) {
        fields
            .field("user_id", IntegerField::new().min_value(1), |s| &s.user_id)
            .field(
                "page_name",
                StringField::new().validator(page_name_validator),
                |s| &s.page_name,
            );
    }

    fn name() -> &'static str {
        "crawler"
    }

    fn pre_fire(&mut self) -> anyhow::Result<PreFire> {
        let url = self.url()?;
        let seen = self
            .crawled
            .lock()
            .map_err(|_| anyhow!("crawl log lock poisoned"))?
            .contains(&url);
        self.url = Some(url);

        if seen {
            return Ok(PreFire::skip("Page already crawled!"));
        }
        Ok(PreFire::Proceed)
    }

    fn fire(&mut self, _extras: &Extras) -> anyhow::Result<()> {
        let url = self.url.clone().ok_or_else(|| anyhow!("no url to crawl"))?;
        self.crawled
            .lock()
            .map_err(|_| anyhow!("crawl log lock poisoned"))?
            .insert(url);
        Ok(())
    }

    fn post_fire(&mut self, fired: bool, _interrupt: Option<&Interrupt>) -> Value {
        json!({ "url": self.url, "crawled": fired })
    }
}

/// String field accepting three dash-separated groups of three characters
pub fn id_field() -> StringField {
    StringField::new().extend_default(|name, value: &String| {
        let parts: Vec<&str> = value.split('-').collect();
        if parts.len() != 3 || parts.iter().any(|p| p.chars().count() != 3) {
            return Err(ValidationError::new(name, "Improper format"));
        }
        Ok(())
    })
}

#[derive(Default)]
pub struct Account {
    user_id: Frozen<String>,
    display_name: Frozen<String>,
}

impl Service for Account {
    type Output = Value;

    fn declare(fields: &mut FieldSet<Self>) {
        fields
            .field("user_id", id_field(), |s| &s.user_id)
            .field(
                "display_name",
                StringField::new().max_length(32).not_required(),
                |s| &s.display_name,
            );
    }

    fn name() -> &'static str {
        "account"
    }

    fn post_fire(&mut self, fired: bool, _interrupt: Option<&Interrupt>) -> Value {
        if !fired {
            return Value::Null;
        }
        json!({
            "user_id": self.user_id.get(),
            "display_name": self.display_name.get(),
        })
    }
}

pub type Cube = Vec<Vec<Vec<char>>>;

#[derive(Default)]
pub struct Grid {
    grid: Frozen<Cube>,
    cells: usize,
}

impl Service for Grid {
    type Output = Value;

    fn declare(fields: &mut FieldSet<Self>) {
        fields.field(
            "grid",
            ListField::of(ListField::of(ListField::of(CharacterField::new()))),
            |s| &s.grid,
        );
    }

    fn name() -> &'static str {
        "grid"
    }

    fn fire(&mut self, _extras: &Extras) -> anyhow::Result<()> {
        self.cells = self.grid.value()?.iter().flatten().map(Vec::len).sum();
        Ok(())
    }

    fn post_fire(&mut self, fired: bool, _interrupt: Option<&Interrupt>) -> Value {
        if !fired {
            return Value::Null;
        }
        json!({ "grid": self.grid.get(), "cells": self.cells })
    }
}
