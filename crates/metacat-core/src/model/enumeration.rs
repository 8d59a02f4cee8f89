//! Enumerations.

use super::insert_unique;
use crate::error::Error;
use indexmap::IndexMap;

/// A member of an enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumMember {
    /// Member name (unique within the enumeration).
    pub name: String,
    /// Stored value; never reused within the enumeration.
    pub value: i32,
    /// Description.
    pub desc: String,
}

/// An enumeration schema object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enumeration {
    /// Enumeration name (unique among enumerations).
    pub name: String,
    /// Description.
    pub desc: String,
    /// Last value minted for a member. Never decreases.
    pub serial_number: i32,
    /// Members in declaration order.
    pub members: IndexMap<String, EnumMember>,
}

impl Enumeration {
    /// Create an empty enumeration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a member with a freshly minted value.
    ///
    /// Returns the value assigned to the member.
    pub fn append_member(
        &mut self,
        name: impl Into<String>,
        desc: impl Into<String>,
    ) -> Result<i32, Error> {
        let name = name.into();
        if self.members.contains_key(&name) {
            return Err(Error::DuplicateKey {
                scope: format!("enumeration {}", self.name),
                key: name,
            });
        }
        let value = self.serial_number + 1;
        self.append_existing(EnumMember {
            name,
            value,
            desc: desc.into(),
        })?;
        Ok(value)
    }

    /// Append a member that already carries its value, as read from a
    /// persisted document. Raises the serial number if needed.
    pub fn append_existing(&mut self, member: EnumMember) -> Result<(), Error> {
        let value = member.value;
        let scope = format!("enumeration {}", self.name);
        insert_unique(&mut self.members, &scope, member.name.clone(), member)?;
        self.serial_number = self.serial_number.max(value);
        Ok(())
    }

    /// Find a member by value.
    pub fn member_by_value(&self, value: i32) -> Option<&EnumMember> {
        self.members.values().find(|m| m.value == value)
    }
}
