//! Per-device resource aggregation.
//!
//! For one end device the traversal is:
//!
//! ```text
//! EndDevice ─ FunctionSetAssignmentsListLink
//!   └ FunctionSetAssignments* ─ DERProgramListLink
//!       └ DERProgram* ─┬ ActiveDERControlListLink
//!                      ├ DefaultDERControlLink
//!                      ├ DERControlListLink
//!                      └ DERCurveListLink
//! EndDevice ─ DERListLink
//! ```
//!
//! Function set assignments and programs are walked in server order. The
//! four child links of a program are independent and are fetched together;
//! their results are merged only after all four complete.

use crate::error::ClientError;
use crate::resolver::LinkResolver;
use csip_client_core::{
    ClientAggregate, DefaultDerControl, DerControlList, DerCurveList, DerList, DerProgram,
    DerProgramList, EndDevice, FunctionSetAssignmentsList, ProgramResources,
};
use csip_client_http::Transport;

/// Builds the aggregate of one end device.
pub struct ResourceAggregator<'r, 'a, T> {
    resolver: &'r LinkResolver<'a, T>,
}

impl<'r, 'a, T: Transport> ResourceAggregator<'r, 'a, T> {
    /// Create an aggregator on top of `resolver`.
    #[must_use]
    pub fn new(resolver: &'r LinkResolver<'a, T>) -> Self {
        Self { resolver }
    }

    /// Walk everything below `device`.
    ///
    /// Nothing is returned unless every fetch succeeds, so a failed device
    /// leaves no partial aggregate behind.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedMediaType` if the device has no function set
    /// assignment link, and any resolver error from the walk.
    pub async fn aggregate(&self, device: &EndDevice) -> Result<ClientAggregate, ClientError> {
        let Some(fsa_link) = device.function_set_assignments_list_link.as_ref() else {
            tracing::warn!(
                device = ?device.href,
                "End device has no function set assignments link"
            );
            return Err(ClientError::UnsupportedMediaType {
                href: None,
                content_type: None,
            });
        };

        let assignments: FunctionSetAssignmentsList = self.resolver.resolve(fsa_link).await?;
        let mut aggregate = ClientAggregate::new();

        for fsa in &assignments.function_set_assignments {
            let Some(program_link) = fsa.der_program_list_link.as_ref() else {
                tracing::debug!(fsa = ?fsa.href, "Assignment has no DER program list link");
                continue;
            };

            let programs: DerProgramList = self.resolver.resolve(program_link).await?;
            for program in &programs.der_program {
                aggregate.absorb_program(self.program_resources(program).await?);
            }
            aggregate.push_program_list(programs);
        }

        aggregate.insert_function_set_assignments(fsa_link.clone(), assignments);

        if let Some(der_link) = device.der_list_link.as_ref() {
            let ders: DerList = self.resolver.resolve(der_link).await?;
            aggregate.der_list = Some(ders);
        }

        tracing::debug!(
            device = ?device.href,
            program_lists = aggregate.der_programs.len(),
            programs = aggregate.program_count(),
            "Aggregated device"
        );

        Ok(aggregate)
    }

    /// Fetch the active controls, default control, control list, and curve
    /// list of one program.
    ///
    /// # Errors
    ///
    /// Returns the first resolver error among the four fetches.
    pub async fn program_resources(
        &self,
        program: &DerProgram,
    ) -> Result<ProgramResources, ClientError> {
        let (active, default_control, control_list, curve_list) = tokio::try_join!(
            self.resolver
                .resolve_optional::<DerControlList>(program.active_der_control_list_link.as_ref()),
            self.resolver
                .resolve_optional::<DefaultDerControl>(program.default_der_control_link.as_ref()),
            self.resolver
                .resolve_optional::<DerControlList>(program.der_control_list_link.as_ref()),
            self.resolver
                .resolve_optional::<DerCurveList>(program.der_curve_list_link.as_ref()),
        )?;

        Ok(ProgramResources {
            active_controls: active.map(|(_, list)| list),
            default_control,
            control_list,
            curve_list,
        })
    }
}
