use super::client::ClientId;
use super::culling::{is_visible, nearest_at};
use super::view_state::ViewState;
use crate::domain::ecg::{EcgAnnotation, EcgAnnotationCode, EcgSignal, EcgWavePoint, EcgWavePointType};
use crate::domain::geometry::{Line, Point, Polyline, Rectangle};
use derive_more::Display;
use serde::Serialize;
use strum::{AsRefStr, EnumIter};

/// Cell-relative y of beat markers that are not pinned to the curve.
pub const UNPINNED_BEAT_TOP: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, AsRefStr, Serialize)]
pub enum DrawingObjectType {
    Signal,
    Beats,
    Annotation,
    Pqrst,
    FloatingPoint,
    FloatingPeak,
}

/// Kind specific geometry. Amplitudes stay in microvolts; only horizontal
/// placement is resolved to pixels at build time.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingPayload {
    /// One polyline per lead, `top` in µV
    Signal { polylines: Vec<Polyline> },
    /// One lane per lead. Pinned: `top` in µV. Unpinned: `top` in px below the cell top.
    Beats { lanes: Vec<Polyline>, pinned: bool },
    Annotation { points: [Point; 2], range: (usize, usize), code: EcgAnnotationCode },
    Pqrst { points: [Point; 2], range: (usize, usize), kinds: [EcgWavePointType; 2] },
    /// Crosshair in container-local px plus one µV point per lead
    FloatingPoint { line: Line, points: Vec<Point> },
    FloatingPeak { line: Line, points: Vec<Point> },
}

/// Immutable renderable built from raw records and the current view state.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingObject {
    /// Index of the source record
    pub index: usize,
    pub owner: ClientId,
    /// Bounding box in absolute (unscrolled) pixel space
    pub container: Rectangle,
    pub payload: DrawingPayload,
}

fn sample_x(state: &ViewState, skip_px: f64, sample: usize) -> f64 {
    skip_px + (sample / state.sample_step()) as f64
}

impl DrawingObject {
    pub fn kind(&self) -> DrawingObjectType {
        match self.payload {
            DrawingPayload::Signal { .. } => DrawingObjectType::Signal,
            DrawingPayload::Beats { .. } => DrawingObjectType::Beats,
            DrawingPayload::Annotation { .. } => DrawingObjectType::Annotation,
            DrawingPayload::Pqrst { .. } => DrawingObjectType::Pqrst,
            DrawingPayload::FloatingPoint { .. } => DrawingObjectType::FloatingPoint,
            DrawingPayload::FloatingPeak { .. } => DrawingObjectType::FloatingPeak,
        }
    }

    pub fn polylines(&self) -> &[Polyline] {
        match &self.payload {
            DrawingPayload::Signal { polylines } => polylines,
            DrawingPayload::Beats { lanes, .. } => lanes,
            _ => &[],
        }
    }

    /// One point per pixel column starting at `skip_px`; the container ends
    /// where the next record begins.
    pub fn prepare_signal(index: usize, signal: &EcgSignal, state: &ViewState, owner: ClientId, skip_px: f64) -> Self {
        let step = state.sample_step();
        let columns = state.samples_to_px(signal.sample_count());
        let polylines = signal
            .channels
            .iter()
            .map(|channel| {
                Polyline::new(
                    channel
                        .iter()
                        .step_by(step)
                        .take(columns as usize)
                        .enumerate()
                        .map(|(k, &amplitude)| Point::new(skip_px + k as f64, amplitude as f64))
                        .collect(),
                )
            })
            .collect();

        Self {
            index,
            owner,
            container: Rectangle::new(skip_px, 0.0, columns, state.container.height),
            payload: DrawingPayload::Signal { polylines },
        }
    }

    /// `signals` are the already built signal objects overlapping this
    /// record. Each beat pins to this record's own signal, or failing that
    /// to whichever overlapping signal owns its x.
    #[allow(clippy::too_many_arguments)]
    pub fn prepare_beats(
        index: usize,
        signals: &[&DrawingObject],
        beats: &[usize],
        state: &ViewState,
        owner: ClientId,
        skip_px: f64,
        sample_count: usize,
        pin_beats: bool,
    ) -> Self {
        let lanes_count = state.grid_cells.len();
        let mut lanes = vec![Polyline::default(); lanes_count];

        let own: Vec<&DrawingObject> = signals.iter().copied().filter(|o| o.index == index).collect();
        for &beat in beats {
            let x = sample_x(state, skip_px, beat);
            let pinned_to = if pin_beats { nearest_at(&own, x).or_else(|| nearest_at(signals, x)) } else { None };
            for (lead, lane) in lanes.iter_mut().enumerate() {
                let top = if pin_beats {
                    pinned_to
                        .and_then(|signal| signal.polylines().get(lead))
                        .and_then(|polyline| polyline.nearest(x))
                        .map(|p| p.top)
                        .unwrap_or(0.0)
                } else {
                    UNPINNED_BEAT_TOP
                };
                lane.points.push(Point::new(x, top));
            }
        }

        Self {
            index,
            owner,
            container: Rectangle::new(skip_px, 0.0, state.samples_to_px(sample_count), state.container.height),
            payload: DrawingPayload::Beats { lanes, pinned: pin_beats },
        }
    }

    /// Two consecutive wave points of one record; `range` indexes the
    /// record's wave point list.
    pub fn prepare_pqrst_complex(
        index: usize,
        wave_points: [&EcgWavePoint; 2],
        range: (usize, usize),
        state: &ViewState,
        owner: ClientId,
        skip_px: f64,
    ) -> Self {
        let a = Point::new(sample_x(state, skip_px, wave_points[0].index), 0.0);
        let b = Point::new(sample_x(state, skip_px, wave_points[1].index), 0.0);
        let left = a.left.min(b.left);
        Self {
            index,
            owner,
            container: Rectangle::new(left, 0.0, (a.left - b.left).abs(), state.container.height),
            payload: DrawingPayload::Pqrst {
                points: [a, b],
                range,
                kinds: [wave_points[0].kind, wave_points[1].kind],
            },
        }
    }

    pub fn prepare_annotation(
        index: usize,
        annotation: &EcgAnnotation,
        state: &ViewState,
        owner: ClientId,
        skip_px: f64,
    ) -> Self {
        let start = Point::new(sample_x(state, skip_px, annotation.start), 0.0);
        let end = Point::new(sample_x(state, skip_px, annotation.end.max(annotation.start)), 0.0);
        Self {
            index,
            owner,
            container: Rectangle::new(start.left, 0.0, end.left - start.left, state.container.height),
            payload: DrawingPayload::Annotation {
                points: [start, end],
                range: (annotation.start, annotation.end),
                code: annotation.code,
            },
        }
    }

    /// Crosshair at the container-local `pointer` plus the amplitude of the
    /// sample under it in every lead.
    pub fn prepare_floating_point(
        signals: &[&DrawingObject],
        pointer: Point,
        state: &ViewState,
        owner: ClientId,
    ) -> Option<Self> {
        let x = state.min_px + pointer.left;
        let signal = nearest_at(signals, x)?;
        let points = signal
            .polylines()
            .iter()
            .map(|polyline| {
                let top = polyline.nearest(x).map(|p| p.top).unwrap_or(0.0);
                Point::new(pointer.left, top)
            })
            .collect();

        Some(Self {
            index: signal.index,
            owner,
            container: Rectangle::new(x, 0.0, 0.0, state.container.height),
            payload: DrawingPayload::FloatingPoint {
                line: Line::vertical(pointer.left, 0.0, state.container.height),
                points,
            },
        })
    }

    /// Like the floating point, but each lead's marker jumps to the largest
    /// absolute amplitude within `window_px` of the pointer.
    pub fn prepare_floating_peak(
        signals: &[&DrawingObject],
        pointer: Point,
        state: &ViewState,
        owner: ClientId,
        window_px: f64,
    ) -> Option<Self> {
        let x = state.min_px + pointer.left;
        let (from, to) = (x - window_px.abs(), x + window_px.abs());
        let nearby: Vec<&DrawingObject> = signals
            .iter()
            .copied()
            .filter(|o| is_visible(&o.container, from, to))
            .collect();
        let anchor = nearest_at(&nearby, x).or_else(|| nearby.first().copied())?;
        let leads = nearby.iter().map(|o| o.polylines().len()).max().unwrap_or(0);

        let points = (0..leads)
            .map(|lead| {
                nearby
                    .iter()
                    .filter_map(|o| o.polylines().get(lead))
                    .flat_map(|polyline| polyline.points.iter())
                    .filter(|p| p.left >= from && p.left <= to)
                    .max_by(|a, b| a.top.abs().total_cmp(&b.top.abs()))
                    .map(|p| Point::new(p.left - state.min_px, p.top))
                    .unwrap_or(Point::new(pointer.left, 0.0))
            })
            .collect();

        Some(Self {
            index: anchor.index,
            owner,
            container: Rectangle::new(x, 0.0, 0.0, state.container.height),
            payload: DrawingPayload::FloatingPeak {
                line: Line::vertical(pointer.left, 0.0, state.container.height),
                points,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ecg::EcgLeadCode;

    fn state() -> ViewState {
        let mut s = ViewState::new();
        let rect = Rectangle::new(0.0, 0.0, 100.0, 200.0);
        s.set_container(rect, rect);
        s.prepare_grid_cells(&[EcgLeadCode::I, EcgLeadCode::II], &[]);
        s.sample_rate = 250.0;
        s.original_sample_rate = 250.0;
        s
    }

    fn signal(n: usize) -> EcgSignal {
        EcgSignal::new(
            250.0,
            vec![(0..n).map(|i| i as f32 * 10.0).collect(), (0..n).map(|i| -(i as f32)).collect()],
        )
    }

    #[test]
    fn signal_keeps_raw_microvolts() {
        let o = DrawingObject::prepare_signal(0, &signal(5), &state(), ClientId(0), 20.0);
        assert_eq!(o.kind(), DrawingObjectType::Signal);
        assert_eq!(o.container.min_ox(), 20.0);
        assert_eq!(o.container.max_ox(), 25.0);
        assert_eq!(o.polylines()[0].points[3], Point::new(23.0, 30.0));
        assert_eq!(o.polylines()[1].points[4], Point::new(24.0, -4.0));
    }

    #[test]
    fn downsampled_signal_takes_every_nth_sample() {
        let mut s = state();
        s.sample_rate = 125.0;
        let o = DrawingObject::prepare_signal(0, &signal(5), &s, ClientId(0), 0.0);
        let tops: Vec<f64> = o.polylines()[0].points.iter().map(|p| p.top).collect();
        assert_eq!(tops, vec![0.0, 20.0, 40.0]);
        assert_eq!(o.container.width, 3.0);
    }

    #[test]
    fn pinned_beats_take_signal_amplitude() {
        let s = state();
        let sig = DrawingObject::prepare_signal(0, &signal(10), &s, ClientId(0), 0.0);
        let beats = DrawingObject::prepare_beats(0, &[&sig], &[3, 7], &s, ClientId(1), 0.0, 10, true);
        let lanes = beats.polylines();
        assert_eq!(lanes.len(), 2);
        assert_eq!(lanes[0].points[1], Point::new(7.0, 70.0));
        assert_eq!(lanes[1].points[0], Point::new(3.0, -3.0));
    }

    #[test]
    fn unpinned_beats_use_fixed_offset() {
        let s = state();
        let beats = DrawingObject::prepare_beats(0, &[], &[3], &s, ClientId(1), 0.0, 10, false);
        assert_eq!(beats.polylines()[0].points[0].top, UNPINNED_BEAT_TOP);
        assert!(matches!(beats.payload, DrawingPayload::Beats { pinned: false, .. }));
    }

    #[test]
    fn floating_point_reads_sample_under_pointer() {
        let s = state();
        let sig = DrawingObject::prepare_signal(0, &signal(50), &s, ClientId(0), 0.0);
        let fp = DrawingObject::prepare_floating_point(&[&sig], Point::new(12.0, 40.0), &s, ClientId(2))
            .expect("pointer over signal");
        match fp.payload {
            DrawingPayload::FloatingPoint { line, points } => {
                assert_eq!(line, Line::vertical(12.0, 0.0, 200.0));
                assert_eq!(points, vec![Point::new(12.0, 120.0), Point::new(12.0, -12.0)]);
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn floating_peak_picks_largest_magnitude_in_window() {
        let s = state();
        let sig = DrawingObject::prepare_signal(0, &signal(50), &s, ClientId(0), 0.0);
        let fp = DrawingObject::prepare_floating_peak(&[&sig], Point::new(10.0, 0.0), &s, ClientId(3), 2.0)
            .expect("peak");
        match fp.payload {
            DrawingPayload::FloatingPeak { points, .. } => {
                assert_eq!(points[0], Point::new(12.0, 120.0));
                assert_eq!(points[1], Point::new(12.0, -12.0));
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[test]
    fn floating_point_needs_a_signal() {
        assert!(DrawingObject::prepare_floating_point(&[], Point::new(1.0, 1.0), &state(), ClientId(0)).is_none());
    }
}
