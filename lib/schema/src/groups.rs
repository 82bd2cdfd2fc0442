//! Group-size table
//!
//! How many vector slots each encoded field occupies, in the one field
//! order shared by assembly and reconstruction.

use crate::codec::FieldCodec;
use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub field: String,
    pub width: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupSizes {
    groups: Vec<Group>,
}

impl GroupSizes {
    /// Build from fitted codecs in field order; zero-width codecs are skipped
    pub fn from_codecs<'a, I>(codecs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a FieldCodec)>,
    {
        let groups = codecs
            .into_iter()
            .filter(|(_, codec)| codec.is_encoded())
            .map(|(field, codec)| Group {
                field: field.to_string(),
                width: codec.width(),
            })
            .collect();
        Self { groups }
    }

    /// Sum of all widths: the length of every vector
    pub fn total(&self) -> usize {
        self.groups.iter().map(|g| g.width).sum()
    }

    pub fn get(&self, field: &str) -> Option<usize> {
        self.groups.iter().find(|g| g.field == field).map(|g| g.width)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    /// Contiguous slot range of every field, in order
    pub fn spans(&self) -> impl Iterator<Item = (&str, Range<usize>)> {
        self.groups.iter().scan(0, |offset, group| {
            let start = *offset;
            *offset += group.width;
            Some((group.field.as_str(), start..*offset))
        })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
