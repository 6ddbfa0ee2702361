mod hierarchy;

use crate::model::*;

pub(crate) fn base_diagram() -> BowtieDiagram {
    BowtieDiagram {
        id: "diagram-1".to_string(),
        name: "Test Diagram".to_string(),
        hazard: Some(Hazard {
            id: "hazard-1".to_string(),
            label: "Driving a commercial vehicle on a highway".to_string(),
            description: None,
        }),
        top_event: TopEvent {
            id: "top-event-1".to_string(),
            label: "Loss of control over the vehicle at 70 mph".to_string(),
            description: None,
            severity: Some(Severity::High),
        },
        threats: vec![Threat {
            id: "threat-1".to_string(),
            label: "Distracted driving".to_string(),
            description: None,
            level: 0,
            parent_id: None,
            severity: None,
            appearance: None,
            sub_threats: Vec::new(),
        }],
        consequences: vec![Consequence {
            id: "consequence-1".to_string(),
            label: "Crash into a fixed object".to_string(),
            description: None,
            level: 0,
            parent_id: None,
            severity: None,
            appearance: None,
            sub_consequences: Vec::new(),
        }],
        barriers: vec![
            Barrier {
                id: "barrier-1".to_string(),
                label: "Driver self-reporting".to_string(),
                description: None,
                kind: BarrierKind::Preventive,
                effectiveness: None,
                threat_id: Some("threat-1".to_string()),
                consequence_id: None,
                owner: None,
                mechanism: None,
            },
            Barrier {
                id: "barrier-2".to_string(),
                label: "Seatbelts".to_string(),
                description: None,
                kind: BarrierKind::Mitigative,
                effectiveness: None,
                threat_id: None,
                consequence_id: Some("consequence-1".to_string()),
                owner: None,
                mechanism: None,
            },
        ],
    }
}
