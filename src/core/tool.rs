//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use super::backend::{Backend, FieldKind};
use super::manifest::ManifestError;
use super::schema::{self, Section};
use serde_derive::Serialize;
use std::fmt::Display;
use toml::Value;

/// An option written either as a single string or as an array of strings.
#[derive(Debug, PartialEq, Clone)]
pub enum OptList {
    Scalar(String),
    List(Vec<String>),
}

impl OptList {
    fn from_value(path: &str, value: &Value) -> Result<Self, ManifestError> {
        match value {
            Value::String(s) => Ok(Self::Scalar(s.clone())),
            Value::Array(_) => Ok(Self::List(schema::as_strings(path, value)?)),
            _ => Err(ManifestError::WrongType(
                path.to_string(),
                "a string or an array of strings",
            )),
        }
    }

    /// Coerces the option into its ordered list form.
    pub fn normalize(&self) -> Vec<String> {
        match self {
            Self::Scalar(s) => vec![s.clone()],
            Self::List(l) => l.clone(),
        }
    }
}

/// A macro definition or generic passed to a tool.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct Define {
    name: String,
    value: Option<String>,
}

impl Define {
    pub fn new(name: &str, value: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            value: value.map(|v| v.to_string()),
        }
    }

    /// Splits a `KEY=VALUE` entry at its first `=`; an entry without one has no value.
    pub fn parse(s: &str) -> Self {
        match s.split_once('=') {
            Some((k, v)) => Self::new(k.trim(), Some(v.trim())),
            None => Self::new(s.trim(), None),
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_value(&self) -> Option<&String> {
        self.value.as_ref()
    }
}

impl Display for Define {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{}={}", self.name, v),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum DefineList {
    Entries(OptList),
    Table(Vec<Define>),
}

impl DefineList {
    fn from_value(path: &str, value: &Value) -> Result<Self, ManifestError> {
        match value {
            Value::Table(t) => Ok(Self::Table(
                t.iter()
                    .map(|(k, v)| {
                        let text = match v {
                            Value::String(s) => s.clone(),
                            Value::Integer(i) => i.to_string(),
                            Value::Float(x) => x.to_string(),
                            Value::Boolean(b) => b.to_string(),
                            _ => {
                                return Err(ManifestError::WrongType(
                                    format!("{}.{}", path, k),
                                    "a string, number, or boolean",
                                ))
                            }
                        };
                        Ok(Define::new(k, Some(&text)))
                    })
                    .collect::<Result<Vec<Define>, ManifestError>>()?,
            )),
            _ => Ok(Self::Entries(OptList::from_value(path, value)?)),
        }
    }

    pub fn normalize(&self) -> Vec<Define> {
        match self {
            Self::Entries(e) => e.normalize().iter().map(|s| Define::parse(s)).collect(),
            Self::Table(t) => t.clone(),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum ToolValue {
    Opts(OptList),
    Defines(DefineList),
    Text(String),
    Flag(bool),
}

/// The option bag a package declares for one tool.
#[derive(Debug, PartialEq, Clone)]
pub struct ToolConfig {
    id: String,
    backend: Backend,
    values: Vec<(String, ToolValue)>,
}

impl ToolConfig {
    /// Reads the option bag for tool `id` from `section`, accepting only the
    /// fields its backend defines.
    pub fn from_section(id: &str, section: &Section) -> Result<Self, ManifestError> {
        let backend = Backend::from_id(id).ok_or_else(|| {
            ManifestError::UnknownTool(section.path().to_string(), Backend::list_ids())
        })?;
        section.allow(&backend.field_names())?;

        let mut values = Vec::new();
        for (key, value) in section.entries() {
            let path = section.key_path(key);
            let kind = match backend.get_field(key) {
                Some(field) => field.get_kind(),
                None => return Err(ManifestError::UnknownKey(path)),
            };
            let value = match kind {
                FieldKind::Opts => ToolValue::Opts(OptList::from_value(&path, value)?),
                FieldKind::Defines => ToolValue::Defines(DefineList::from_value(&path, value)?),
                FieldKind::Text => ToolValue::Text(schema::as_str(&path, value)?.to_string()),
                FieldKind::Flag => ToolValue::Flag(schema::as_bool(&path, value)?),
            };
            values.push((key.clone(), value));
        }
        Ok(Self {
            id: id.to_ascii_lowercase(),
            backend: backend,
            values: values,
        })
    }

    pub fn get_id(&self) -> &str {
        &self.id
    }

    pub fn get_backend(&self) -> Backend {
        self.backend
    }

    pub fn get(&self, field: &str) -> Option<&ToolValue> {
        self.values.iter().find(|(k, _)| k == field).map(|(_, v)| v)
    }
}
