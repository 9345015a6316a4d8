use prometheus_client::{
    encoding::EncodeLabelSet,
    metrics::{counter::Counter, family::Family},
    registry::Registry,
};

#[derive(Clone, Debug, Default)]
pub struct AdmissionMetrics {
    decisions: Family<DecisionLabels, Counter>,
}

#[derive(Clone, Hash, PartialEq, Eq, EncodeLabelSet, Debug)]
struct DecisionLabels {
    kind: &'static str,
    operation: &'static str,
    decision: &'static str,
}

/// The outcome of an admission request, as recorded by [`AdmissionMetrics`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Forbidden,
    NotReady,
    BadRequest,
}

// === impl AdmissionMetrics ===

impl AdmissionMetrics {
    pub fn register(reg: &mut Registry) -> Self {
        let decisions = Family::<DecisionLabels, Counter>::default();
        reg.register(
            "decisions",
            "Total number of admission requests inspected, by outcome",
            decisions.clone(),
        );
        Self { decisions }
    }

    pub(crate) fn record(&self, kind: &'static str, operation: &'static str, decision: Decision) {
        self.decisions
            .get_or_create(&DecisionLabels {
                kind,
                operation,
                decision: decision.as_str(),
            })
            .inc();
    }
}

// === impl Decision ===

impl Decision {
    fn as_str(self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::Forbidden => "forbidden",
            Self::NotReady => "not_ready",
            Self::BadRequest => "bad_request",
        }
    }
}
