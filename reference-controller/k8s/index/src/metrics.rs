use prometheus_client::{
    collector::Collector,
    encoding::{DescriptorEncoder, EncodeMetric},
    metrics::{gauge::ConstGauge, MetricType},
    registry::Registry,
};
use reference_controller_core::Kind;

use super::SharedIndex;

#[derive(Debug)]
struct Instrumented(SharedIndex);

pub fn register(reg: &mut Registry, index: SharedIndex) {
    reg.register_collector(Box::new(Instrumented(index)));
}

impl Collector for Instrumented {
    fn encode(&self, mut encoder: DescriptorEncoder<'_>) -> Result<(), std::fmt::Error> {
        let this = self.0.read();

        let synced_encoder = encoder.encode_descriptor(
            "synced",
            "Whether every indexed kind has completed its initial listing",
            None,
            MetricType::Gauge,
        )?;
        ConstGauge::new(this.is_synced() as u32).encode(synced_encoder)?;

        let mut size_encoder = encoder.encode_descriptor(
            "size",
            "The number of resources in the index",
            None,
            MetricType::Gauge,
        )?;
        for kind in Kind::INDEXED {
            for (ns, len) in this.namespaces(kind) {
                let labels = [("kind", kind.as_str()), ("namespace", ns)];
                let size_encoder = size_encoder.encode_family(&labels)?;
                ConstGauge::new(len as u32).encode(size_encoder)?;
            }
        }

        Ok(())
    }
}
