//! Per-device traversal results.
//!
//! A `ClientAggregate` is assembled from the leaves up: each program's child
//! resources are collected into a `ProgramResources` value and absorbed in
//! one step, and a finished aggregate is merged into whatever a previous
//! handshake left behind.
//!
//! Link-keyed stores overwrite per link, so resolving the same link twice
//! never adds an entry.

use crate::link::Link;
use crate::resources::{
    DefaultDerControl, DerControlList, DerCurveList, DerList, DerProgramList,
    FunctionSetAssignmentsList,
};
use std::collections::BTreeMap;

/// Child resources of one DER program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramResources {
    /// Currently active controls
    pub active_controls: Option<DerControlList>,
    /// Default control and the link it was fetched from
    pub default_control: Option<(Link, DefaultDerControl)>,
    /// Scheduled controls and the link they were fetched from
    pub control_list: Option<(Link, DerControlList)>,
    /// Curves and the link they were fetched from
    pub curve_list: Option<(Link, DerCurveList)>,
}

impl ProgramResources {
    /// Whether nothing was resolved for the program.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active_controls.is_none()
            && self.default_control.is_none()
            && self.control_list.is_none()
            && self.curve_list.is_none()
    }
}

/// Everything fetched for one end device.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientAggregate {
    /// Function set assignment lists keyed by the link they were fetched from
    pub function_set_assignments: BTreeMap<Link, FunctionSetAssignmentsList>,
    /// Program lists in fetch order
    pub der_programs: Vec<DerProgramList>,
    /// Most recently fetched active control list
    pub active_der_controls: Option<DerControlList>,
    /// Default controls keyed by link
    pub default_der_controls: BTreeMap<Link, DefaultDerControl>,
    /// Control lists keyed by link
    pub der_controls: BTreeMap<Link, DerControlList>,
    /// Curve lists keyed by link
    pub der_curves: BTreeMap<Link, DerCurveList>,
    /// The device's DER list, when it advertises one
    pub der_list: Option<DerList>,
}

impl ClientAggregate {
    /// Create an empty aggregate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a function set assignment list under the link it came from.
    pub fn insert_function_set_assignments(
        &mut self,
        link: Link,
        list: FunctionSetAssignmentsList,
    ) {
        self.function_set_assignments.insert(link, list);
    }

    /// Append a program list.
    pub fn push_program_list(&mut self, list: DerProgramList) {
        self.der_programs.push(list);
    }

    /// Absorb the child resources of one program.
    ///
    /// The active control slot is overwritten only when the program had an
    /// active control list; link-keyed entries overwrite per link.
    pub fn absorb_program(&mut self, program: ProgramResources) {
        let ProgramResources {
            active_controls,
            default_control,
            control_list,
            curve_list,
        } = program;

        if let Some(active) = active_controls {
            self.active_der_controls = Some(active);
        }
        if let Some((link, control)) = default_control {
            self.default_der_controls.insert(link, control);
        }
        if let Some((link, list)) = control_list {
            self.der_controls.insert(link, list);
        }
        if let Some((link, list)) = curve_list {
            self.der_curves.insert(link, list);
        }
    }

    /// Merge a newer aggregate for the same device into this one.
    ///
    /// Link-keyed maps take the newer value per link, program lists are
    /// appended, and single-value slots are replaced when the newer
    /// aggregate has a value.
    pub fn merge(&mut self, newer: ClientAggregate) {
        let ClientAggregate {
            function_set_assignments,
            der_programs,
            active_der_controls,
            default_der_controls,
            der_controls,
            der_curves,
            der_list,
        } = newer;

        self.function_set_assignments
            .extend(function_set_assignments);
        self.der_programs.extend(der_programs);
        if active_der_controls.is_some() {
            self.active_der_controls = active_der_controls;
        }
        self.default_der_controls.extend(default_der_controls);
        self.der_controls.extend(der_controls);
        self.der_curves.extend(der_curves);
        if der_list.is_some() {
            self.der_list = der_list;
        }
    }

    /// Total number of programs across all program lists.
    #[must_use]
    pub fn program_count(&self) -> usize {
        self.der_programs.iter().map(|l| l.der_program.len()).sum()
    }
}
