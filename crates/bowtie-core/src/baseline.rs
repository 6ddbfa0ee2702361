//! Built-in baseline diagram: highway driving loss-of-control bow-tie.
//!
//! Mirrors the seed data used by the editor side. Tests and demos use this
//! instead of fetching from a remote store.

use crate::model::{
    Appearance, Barrier, BarrierKind, BowtieDiagram, Consequence, Effectiveness, Hazard, Mechanism,
    Severity, Threat, TopEvent,
};

fn threat_appearance() -> Appearance {
    Appearance {
        background: "linear-gradient(135deg,#1d4ed8,#60a5fa)".to_string(),
        border_color: "#1e40af".to_string(),
        text_color: "#eff6ff".to_string(),
        shadow_color: "rgba(30,64,175,0.35)".to_string(),
    }
}

fn consequence_appearance() -> Appearance {
    Appearance {
        background: "linear-gradient(135deg,#dc2626,#fca5a5)".to_string(),
        border_color: "#991b1b".to_string(),
        text_color: "#fff1f2".to_string(),
        shadow_color: "rgba(220,38,38,0.35)".to_string(),
    }
}

fn threat(id: &str, label: &str, description: &str, severity: Severity) -> Threat {
    Threat {
        id: id.to_string(),
        label: label.to_string(),
        description: Some(description.to_string()),
        level: 0,
        parent_id: None,
        severity: Some(severity),
        appearance: Some(threat_appearance()),
        sub_threats: Vec::new(),
    }
}

fn consequence(id: &str, label: &str, description: &str, severity: Severity) -> Consequence {
    Consequence {
        id: id.to_string(),
        label: label.to_string(),
        description: Some(description.to_string()),
        level: 0,
        parent_id: None,
        severity: Some(severity),
        appearance: Some(consequence_appearance()),
        sub_consequences: Vec::new(),
    }
}

/// The baseline highway-driving diagram.
pub fn baseline_diagram() -> BowtieDiagram {
    BowtieDiagram {
        id: "hazard-top-event".to_string(),
        name: "Hazard & Top Event".to_string(),
        hazard: Some(Hazard {
            id: "hazard-vehicle-highway".to_string(),
            label: "Driving a commercial vehicle on a highway".to_string(),
            description: Some(
                "Operating a loaded commercial vehicle on a public highway.".to_string(),
            ),
        }),
        top_event: TopEvent {
            id: "top-event-loss-of-control".to_string(),
            label: "Loss of control over the vehicle at 70 mph".to_string(),
            description: Some(
                "Unintended vehicle movement that can escalate to severe incidents.".to_string(),
            ),
            severity: Some(Severity::High),
        },
        threats: vec![
            threat(
                "threat-intoxicated-driving",
                "Intoxicated driving",
                "Driver operates while impaired by alcohol or drugs.",
                Severity::Critical,
            ),
            threat(
                "threat-distracted-driving",
                "Distracted driving",
                "Loss of focus due to phones, food, or other activities.",
                Severity::High,
            ),
            threat(
                "threat-slippery-road",
                "Driving on slippery road",
                "Reduced tire traction from rain, snow, or spilled fluids.",
                Severity::Medium,
            ),
            threat(
                "threat-poor-visibility",
                "Driving with poor visibility",
                "Fog, heavy rain, or darkness limits the driver's view.",
                Severity::Medium,
            ),
        ],
        consequences: vec![
            consequence(
                "consequence-fixed-object",
                "Crash into a fixed object",
                "Collision with guard rails, barriers, or poles.",
                Severity::High,
            ),
            consequence(
                "consequence-driver-impact",
                "Driver impacts internals of the vehicle",
                "Occupants strike internal vehicle surfaces.",
                Severity::High,
            ),
            consequence(
                "consequence-rollover",
                "Vehicle roll-over",
                "Vehicle overturns due to loss of stability.",
                Severity::Critical,
            ),
        ],
        barriers: vec![
            Barrier {
                id: "barrier-sobriety-program".to_string(),
                label: "Driver sobriety program".to_string(),
                description: Some(
                    "Random testing and self-reporting keep impaired drivers off shift."
                        .to_string(),
                ),
                kind: BarrierKind::Preventive,
                effectiveness: Some(Effectiveness::Medium),
                threat_id: Some("threat-intoxicated-driving".to_string()),
                consequence_id: None,
                owner: Some("Fleet Safety Manager".to_string()),
                mechanism: Some(Mechanism::ActiveHuman),
            },
            Barrier {
                id: "barrier-ignition-interlock".to_string(),
                label: "Alcohol ignition interlock".to_string(),
                description: Some(
                    "Breathalyzer interlock blocks engine start for impaired drivers.".to_string(),
                ),
                kind: BarrierKind::Preventive,
                effectiveness: Some(Effectiveness::High),
                threat_id: Some("threat-intoxicated-driving".to_string()),
                consequence_id: None,
                owner: Some("Vehicle Engineering".to_string()),
                mechanism: Some(Mechanism::ActiveHardware),
            },
            Barrier {
                id: "barrier-phone-lockout".to_string(),
                label: "In-cab phone lockout".to_string(),
                description: Some(
                    "Telematics disable handheld devices while the vehicle moves.".to_string(),
                ),
                kind: BarrierKind::Preventive,
                effectiveness: Some(Effectiveness::Medium),
                threat_id: Some("threat-distracted-driving".to_string()),
                consequence_id: None,
                owner: Some("Fleet Safety Manager".to_string()),
                mechanism: Some(Mechanism::ActiveHardware),
            },
            Barrier {
                id: "barrier-crash-attenuator".to_string(),
                label: "Crash attenuator infrastructure".to_string(),
                description: Some(
                    "Impact attenuators and guard rails reduce severity when hitting fixed objects."
                        .to_string(),
                ),
                kind: BarrierKind::Mitigative,
                effectiveness: Some(Effectiveness::Medium),
                threat_id: None,
                consequence_id: Some("consequence-fixed-object".to_string()),
                owner: Some("Road Maintenance Lead".to_string()),
                mechanism: Some(Mechanism::PassiveHardware),
            },
            Barrier {
                id: "barrier-driver-restraints".to_string(),
                label: "Driver restraint program".to_string(),
                description: Some(
                    "Seatbelt interlocks and compliance audits keep occupants restrained."
                        .to_string(),
                ),
                kind: BarrierKind::Mitigative,
                effectiveness: Some(Effectiveness::High),
                threat_id: None,
                consequence_id: Some("consequence-driver-impact".to_string()),
                owner: Some("Fleet Safety Manager".to_string()),
                mechanism: Some(Mechanism::ActiveHardware),
            },
            Barrier {
                id: "barrier-airbag-system".to_string(),
                label: "Adaptive airbag systems".to_string(),
                description: Some(
                    "Multi-stage airbags deploy to cushion cockpit impacts.".to_string(),
                ),
                kind: BarrierKind::Mitigative,
                effectiveness: Some(Effectiveness::High),
                threat_id: None,
                consequence_id: Some("consequence-driver-impact".to_string()),
                owner: Some("Vehicle Engineering".to_string()),
                mechanism: Some(Mechanism::ActiveHardware),
            },
            Barrier {
                id: "barrier-rollover-response".to_string(),
                label: "Rollover rapid response plan".to_string(),
                description: Some(
                    "Automatic incident alerting dispatches emergency services and hazmat teams."
                        .to_string(),
                ),
                kind: BarrierKind::Mitigative,
                effectiveness: Some(Effectiveness::Medium),
                threat_id: None,
                consequence_id: Some("consequence-rollover".to_string()),
                owner: Some("Emergency Coordinator".to_string()),
                mechanism: Some(Mechanism::Hybrid),
            },
        ],
    }
}
