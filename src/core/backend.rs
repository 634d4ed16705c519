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

//! The table of known EDA tool backends and the option vocabulary each accepts.

use super::manifest::TargetKind;
use serde_derive::Serialize;

/// How a tool option is written in a manifest and carried in a build plan.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum FieldKind {
    /// A string or a list of strings passed verbatim to the tool.
    Opts,
    /// Key-value pairs given as a table, `KEY=VALUE` strings, or a list of such strings.
    Defines,
    Text,
    Flag,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Fallback {
    None,
    Text(&'static str),
    Flag(bool),
}

#[derive(Debug, PartialEq)]
pub struct Field {
    name: &'static str,
    kind: FieldKind,
    fallback: Fallback,
}

impl Field {
    const fn new(name: &'static str, kind: FieldKind, fallback: Fallback) -> Self {
        Self {
            name: name,
            kind: kind,
            fallback: fallback,
        }
    }

    pub fn get_name(&self) -> &'static str {
        self.name
    }

    pub fn get_kind(&self) -> FieldKind {
        self.kind
    }

    /// The value assumed when no package in the graph sets the field.
    pub fn get_fallback(&self) -> Fallback {
        self.fallback
    }

    /// Checks if the field names a log file.
    pub fn is_log(&self) -> bool {
        self.name.ends_with("_log")
    }
}

static IES_FIELDS: [Field; 12] = [
    Field::new("link_libs", FieldKind::Opts, Fallback::None),
    Field::new("vlog_opts", FieldKind::Opts, Fallback::None),
    Field::new("vhdl_opts", FieldKind::Opts, Fallback::None),
    Field::new("elab_opts", FieldKind::Opts, Fallback::None),
    Field::new("sim_opts", FieldKind::Opts, Fallback::None),
    Field::new("vlog_defines", FieldKind::Defines, Fallback::None),
    Field::new("vhdl_generics", FieldKind::Defines, Fallback::None),
    Field::new("compile_log", FieldKind::Text, Fallback::Text("nc_compile.log")),
    Field::new("elaborate_log", FieldKind::Text, Fallback::Text("nc_elaborate.log")),
    Field::new("simulate_log", FieldKind::Text, Fallback::Text("nc_simulate.log")),
    Field::new("gen_waves", FieldKind::Flag, Fallback::Flag(true)),
    Field::new("use_uvm", FieldKind::Flag, Fallback::Flag(false)),
];

static QUESTA_FIELDS: [Field; 12] = [
    Field::new("link_libs", FieldKind::Opts, Fallback::None),
    Field::new("vlog_opts", FieldKind::Opts, Fallback::None),
    Field::new("vhdl_opts", FieldKind::Opts, Fallback::None),
    Field::new("elab_opts", FieldKind::Opts, Fallback::None),
    Field::new("sim_opts", FieldKind::Opts, Fallback::None),
    Field::new("vlog_defines", FieldKind::Defines, Fallback::None),
    Field::new("vhdl_generics", FieldKind::Defines, Fallback::None),
    Field::new("compile_log", FieldKind::Text, Fallback::Text("compile.log")),
    Field::new("elaborate_log", FieldKind::Text, Fallback::Text("elaborate.log")),
    Field::new("simulate_log", FieldKind::Text, Fallback::Text("simulate.log")),
    Field::new("gen_waves", FieldKind::Flag, Fallback::Flag(true)),
    Field::new("use_uvm", FieldKind::Flag, Fallback::Flag(false)),
];

static VIVADO_FIELDS: [Field; 7] = [
    Field::new("vlog_params", FieldKind::Defines, Fallback::None),
    Field::new("generics", FieldKind::Defines, Fallback::None),
    Field::new("vlog_defines", FieldKind::Defines, Fallback::None),
    Field::new("bitstream_name", FieldKind::Text, Fallback::None),
    Field::new("device_part", FieldKind::Text, Fallback::None),
    Field::new("synth_only", FieldKind::Flag, Fallback::Flag(false)),
    Field::new("build_project_only", FieldKind::Flag, Fallback::Flag(false)),
];

/// A vendor toolchain a build plan can be rendered for.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Ies,
    Questa,
    Vivado,
}

impl Backend {
    /// Every accepted tool identifier, including aliases.
    pub const IDS: [&'static str; 4] = ["ies", "questa", "vsim", "vivado"];

    /// Maps a tool identifier to its backend, ignoring case.
    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_ascii_lowercase().as_str() {
            "ies" => Some(Self::Ies),
            "questa" | "vsim" => Some(Self::Questa),
            "vivado" => Some(Self::Vivado),
            _ => None,
        }
    }

    /// Lists the known tool identifiers for error messages.
    pub fn list_ids() -> String {
        Self::IDS.join(", ")
    }

    pub fn fields(&self) -> &'static [Field] {
        match self {
            Self::Ies => &IES_FIELDS,
            Self::Questa => &QUESTA_FIELDS,
            Self::Vivado => &VIVADO_FIELDS,
        }
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields().iter().map(|f| f.get_name()).collect()
    }

    pub fn get_field(&self, name: &str) -> Option<&'static Field> {
        self.fields().iter().find(|f| f.get_name() == name)
    }

    pub fn supports(&self, target: TargetKind) -> bool {
        match self {
            Self::Ies | Self::Questa => match target {
                TargetKind::Build | TargetKind::Sim | TargetKind::Run => true,
                TargetKind::ProgramDevice => false,
            },
            Self::Vivado => match target {
                TargetKind::Build | TargetKind::ProgramDevice => true,
                TargetKind::Sim | TargetKind::Run => false,
            },
        }
    }

    /// Lists the fields that must be set for the backend to carry out `target`.
    pub fn required(&self, target: TargetKind) -> &'static [&'static str] {
        match (self, target) {
            (Self::Vivado, TargetKind::Build | TargetKind::ProgramDevice) => &["device_part"],
            _ => &[],
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Ies => "ies",
                Self::Questa => "questa",
                Self::Vivado => "vivado",
            }
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_id() {
        assert_eq!(Backend::from_id("IES"), Some(Backend::Ies));
        assert_eq!(Backend::from_id("vsim"), Some(Backend::Questa));
        assert_eq!(Backend::from_id("Vivado"), Some(Backend::Vivado));
        assert_eq!(Backend::from_id("ixs"), None);
        assert_eq!(Backend::list_ids(), "ies, questa, vsim, vivado");
    }

    #[test]
    fn vocabulary() {
        let field = Backend::Questa.get_field("compile_log").unwrap();
        assert_eq!(field.get_kind(), FieldKind::Text);
        assert_eq!(field.get_fallback(), Fallback::Text("compile.log"));
        assert_eq!(field.is_log(), true);
        assert_eq!(Backend::Questa.get_field("use_uvm").is_some(), true);
        assert_eq!(Backend::Vivado.get_field("sim_opts"), None);
        assert_eq!(
            Backend::Ies.get_field("gen_waves").unwrap().get_fallback(),
            Fallback::Flag(true)
        );
    }

    #[test]
    fn targets() {
        assert_eq!(Backend::Ies.supports(TargetKind::Sim), true);
        assert_eq!(Backend::Ies.supports(TargetKind::ProgramDevice), false);
        assert_eq!(Backend::Vivado.supports(TargetKind::Run), false);
        assert_eq!(Backend::Vivado.required(TargetKind::Build), &["device_part"]);
        assert_eq!(Backend::Questa.required(TargetKind::Sim).is_empty(), true);
    }
}
