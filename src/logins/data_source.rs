//! Sectioned view over the current login snapshot
//!
//! Records are bucketed by the uppercase first letter of their registrable
//! domain. Sections are ordered by that letter; rows inside a section by base
//! domain, then full host (both already lowercased), then guid so that equal
//! hosts still have a stable order. Records whose hostname has no registrable
//! domain are kept in the snapshot but never appear in a section.

use super::domain::{host_key, HostKey};
use super::{Guid, Login, Position};
use std::collections::HashMap;
use thiserror::Error;

/// Positional lookup outside the current layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no login at section {}, row {}", .0.section, .0.row)]
pub struct OutOfRange(pub Position);

#[derive(Debug, Clone)]
struct Section {
    title: String,
    /// Indices into the snapshot, in display order
    rows: Vec<usize>,
}

#[derive(Debug, Default)]
pub struct SectionedDataSource {
    snapshot: Vec<Login>,
    sections: Vec<Section>,
    positions: HashMap<Guid, Position>,
}

impl SectionedDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot wholesale and rebuild the section layout.
    pub fn replace_snapshot(&mut self, records: Vec<Login>) {
        let mut keyed: Vec<(usize, HostKey)> = records
            .iter()
            .enumerate()
            .filter_map(|(i, login)| host_key(&login.hostname).map(|k| (i, k)))
            .collect();

        keyed.sort_by(|(ia, a), (ib, b)| {
            a.group
                .cmp(&b.group)
                .then_with(|| a.base_domain.cmp(&b.base_domain))
                .then_with(|| a.host.cmp(&b.host))
                .then_with(|| records[*ia].guid.cmp(&records[*ib].guid))
        });

        let mut sections: Vec<Section> = Vec::new();
        let mut positions = HashMap::with_capacity(keyed.len());
        for (idx, key) in keyed {
            let start_new = sections.last().map_or(true, |s| s.title != key.group);
            if start_new {
                sections.push(Section {
                    title: key.group,
                    rows: Vec::new(),
                });
            }
            let section_idx = sections.len() - 1;
            let section = &mut sections[section_idx];
            positions.insert(
                records[idx].guid.clone(),
                Position::new(section_idx, section.rows.len()),
            );
            section.rows.push(idx);
        }

        self.snapshot = records;
        self.sections = sections;
        self.positions = positions;
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Rows in `section`; zero for a section that does not exist.
    pub fn row_count(&self, section: usize) -> usize {
        self.sections.get(section).map_or(0, |s| s.rows.len())
    }

    pub fn record_at(&self, position: Position) -> Result<&Login, OutOfRange> {
        self.sections
            .get(position.section)
            .and_then(|s| s.rows.get(position.row))
            .map(|&idx| &self.snapshot[idx])
            .ok_or(OutOfRange(position))
    }

    /// Where `record` currently sits, or `None` when it is not in the snapshot
    /// or its hostname no longer yields a registrable domain.
    pub fn position_of(&self, record: &Login) -> Option<Position> {
        let key = host_key(&record.hostname)?;
        let position = self.position_of_guid(&record.guid)?;
        (self.sections[position.section].title == key.group).then_some(position)
    }

    pub fn position_of_guid(&self, guid: &str) -> Option<Position> {
        self.positions.get(guid).copied()
    }

    pub fn section_titles(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.title.as_str()).collect()
    }

    pub fn section_title(&self, section: usize) -> Option<&str> {
        self.sections.get(section).map(|s| s.title.as_str())
    }

    /// Number of records that appear in some section.
    pub fn visible_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_visible(&self, guid: &str) -> bool {
        self.positions.contains_key(guid)
    }

    /// Every sectioned record in display order.
    pub fn visible(&self) -> impl Iterator<Item = (Position, &Login)> + '_ {
        self.sections.iter().enumerate().flat_map(move |(s, section)| {
            section
                .rows
                .iter()
                .enumerate()
                .map(move |(r, &idx)| (Position::new(s, r), &self.snapshot[idx]))
        })
    }

    /// The full snapshot, including records without a section.
    pub fn snapshot(&self) -> &[Login] {
        &self.snapshot
    }
}
