// Stacked history graphs (thermal and fan by default), each labelled with
// its current value at the panel's right edge.

use super::{Layer, Widget, metric_label};
use crate::config::GraphsConfig;
use crate::graph::{GraphArea, draw_graph};
use crate::models::MetricId;
use crate::redraw::Topic;
use crate::state::Telemetry;
use crate::surface::{Font, Rgba};

const BACKGROUND: Rgba = Rgba::grey(0x33);
const FOREGROUND: Rgba = Rgba::grey(0x66);

/// Glyph columns reserved at the right edge for a metric's label.
fn label_columns(id: MetricId) -> u32 {
    match id {
        MetricId::Thermal => 5,
        MetricId::Fan => 13,
        MetricId::Cpu | MetricId::Memory => 12,
    }
}

struct PlacedGraph {
    metric: MetricId,
    area: GraphArea,
    label_x: i64,
    label_y: i64,
}

pub struct GraphPanel {
    layer: Layer,
    graphs: Vec<PlacedGraph>,
}

impl GraphPanel {
    pub fn new(config: &GraphsConfig, font: &dyn Font) -> Self {
        let advance = font.advance();
        let graphs = config
            .metrics
            .iter()
            .enumerate()
            .map(|(i, &metric)| {
                let cols = label_columns(metric);
                let y_offset = (i as u32 * config.spacing) as f64;
                let height = config.graph_height as f64;
                PlacedGraph {
                    metric,
                    area: GraphArea {
                        available_width: config.width.saturating_sub(cols * advance),
                        pitch: config.pitch,
                        height,
                        y_offset,
                    },
                    label_x: config.width as i64 - ((cols - 1) * advance) as i64,
                    label_y: (y_offset + (height - font.height() as f64) / 2.0) as i64,
                }
            })
            .collect();
        Self {
            layer: Layer::new(config.x, config.y, config.width, config.height),
            graphs,
        }
    }

    pub fn areas(&self) -> impl Iterator<Item = (MetricId, &GraphArea)> {
        self.graphs.iter().map(|g| (g.metric, &g.area))
    }
}

impl Widget for GraphPanel {
    fn topics(&self) -> &'static [Topic] {
        &[Topic::Metrics]
    }

    fn paint(&mut self, telemetry: &Telemetry, font: &dyn Font) {
        let surface = &mut self.layer.surface;
        surface.fill(BACKGROUND);
        for graph in &self.graphs {
            telemetry.with_metric(graph.metric, |m| {
                draw_graph(surface, &m.series, &graph.area, FOREGROUND)
            });
            let label = metric_label(graph.metric, telemetry);
            surface.draw_text(font, graph.label_x, graph.label_y, &label, FOREGROUND);
        }
    }

    fn layer(&self) -> &Layer {
        &self.layer
    }

    fn layer_mut(&mut self) -> &mut Layer {
        &mut self.layer
    }
}
