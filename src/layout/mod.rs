//! Random-placement word-cloud layout with collision rejection
//!
//! One placement pass takes the normalized word list, sorts it largest
//! first, and tries up to `max_attempts` uniform random positions per
//! word, accepting the first candidate that clears every already-placed
//! word. Words whose collision budget runs out are dropped from the
//! output. The pass is a pure function of its inputs: the RNG and the
//! text-measurement capability are both injected.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use uuid::Uuid;

/// A display text with its non-negative weight
#[derive(Debug, Clone, PartialEq)]
pub struct WordWeight {
    pub text: String,
    pub value: f64,
}

impl WordWeight {
    pub fn new(text: impl Into<String>, value: f64) -> Self {
        Self {
            text: text.into(),
            value,
        }
    }
}

/// An accepted, collision-free placement
///
/// `x`/`y` are the center of the text box. `order` is the word's index in
/// the sorted attempt sequence; palette cycling keys off it, and a word
/// that could not be placed still consumes its index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedWord {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    pub order: usize,
}

/// Fixed pixel dimensions of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Tunables for a placement pass
#[derive(Debug, Clone)]
pub struct LayoutParams {
    pub base_font_size: f32,
    pub scale_factor: f32,
    pub padding: f32,
    pub max_attempts: u32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            base_font_size: 12.0,
            scale_factor: 60.0,
            padding: 5.0,
            max_attempts: 100,
        }
    }
}

/// Text-measurement capability
///
/// Returns the rendered pixel width of `text` at `font_size`; height is
/// approximated as the font size itself.
pub trait Measure {
    fn width(&self, text: &str, font_size: f32) -> f32;
}

/// Fixed-advance approximation for when no drawing surface exists
pub struct HeuristicMeasure;

impl Measure for HeuristicMeasure {
    fn width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * 0.6
    }
}

/// RNG for one pass, seeded for reproducibility when requested
pub fn pass_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Run one full placement pass
///
/// Zero total weight (including an empty list) is a defined terminal
/// state and yields an empty registry. The registry this returns is
/// owned by the pass; nothing is carried over between runs.
pub fn layout_words<M, R>(
    words: &[WordWeight],
    canvas: CanvasSize,
    params: &LayoutParams,
    measure: &M,
    rng: &mut R,
) -> Vec<PlacedWord>
where
    M: Measure + ?Sized,
    R: Rng + ?Sized,
{
    let total: f64 = words.iter().map(|w| w.value).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    // Largest first, ties keep input order
    let mut sorted: Vec<&WordWeight> = words.iter().collect();
    sorted.sort_by(|a, b| b.value.total_cmp(&a.value));

    let canvas_w = canvas.width as f32;
    let canvas_h = canvas.height as f32;

    let mut placed: Vec<PlacedWord> = Vec::new();
    for (order, word) in sorted.iter().enumerate() {
        let font_size = params.base_font_size + ((word.value / total) as f32) * params.scale_factor;
        let text_width = measure.width(&word.text, font_size);
        let text_height = font_size;

        let mut accepted = false;
        for _ in 0..params.max_attempts {
            let x = sample_axis(rng, text_width, canvas_w, params.padding);
            let y = sample_axis(rng, text_height, canvas_h, params.padding);

            let collides = placed
                .iter()
                .any(|p| overlaps(p, x, y, text_width, text_height, params.padding));

            if !collides {
                placed.push(PlacedWord {
                    text: word.text.clone(),
                    x,
                    y,
                    width: text_width,
                    height: text_height,
                    font_size,
                    order,
                });
                accepted = true;
                break;
            }
        }

        if !accepted {
            tracing::warn!(
                word = %word.text,
                attempts = params.max_attempts,
                "could not place word"
            );
        }
    }

    placed
}

/// Uniform candidate coordinate along one axis, keeping the text box
/// `padding` away from the canvas edge. A word too large for the span
/// collapses the interval to the canvas center.
fn sample_axis<R: Rng + ?Sized>(rng: &mut R, extent: f32, canvas_extent: f32, padding: f32) -> f32 {
    let low = extent / 2.0 + padding;
    let high = canvas_extent - extent / 2.0 - padding;
    if low < high {
        rng.gen_range(low..high)
    } else {
        canvas_extent / 2.0
    }
}

/// The collision rule: two independent per-axis threshold checks, both of
/// which must trip. Kept exactly as the dashboard shipped it, including
/// the padding margin on each axis.
fn overlaps(p: &PlacedWord, x: f32, y: f32, width: f32, height: f32, padding: f32) -> bool {
    let dx = (p.x - x).abs();
    let dy = (p.y - y).abs();
    let min_distance_x = (p.width + width) / 2.0 + padding;
    let min_distance_y = (p.height + height) / 2.0 + padding;
    dx < min_distance_x && dy < min_distance_y
}

/// Summary of one placement pass, suitable for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub canvas: CanvasSize,
    pub total_words: usize,
    pub dropped_words: usize,
    pub placements: Vec<PlacedWord>,
}

impl PassReport {
    pub fn new(canvas: CanvasSize, total_words: usize, placements: Vec<PlacedWord>) -> Self {
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            canvas,
            total_words,
            dropped_words: total_words.saturating_sub(placements.len()),
            placements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params() -> LayoutParams {
        LayoutParams::default()
    }

    fn run(words: &[WordWeight], canvas: CanvasSize, seed: u64) -> Vec<PlacedWord> {
        let mut rng = pass_rng(Some(seed));
        layout_words(words, canvas, &params(), &HeuristicMeasure, &mut rng)
    }

    #[test]
    fn zero_total_weight_places_nothing() {
        let words = vec![
            WordWeight::new("الهلال", 0.0),
            WordWeight::new("النصر", 0.0),
        ];
        let placed = run(&words, CanvasSize::new(800, 400), 1);
        assert_eq!(placed, vec![]);
    }

    #[test]
    fn empty_input_places_nothing() {
        let placed = run(&[], CanvasSize::new(800, 400), 1);
        assert_eq!(placed, vec![]);
    }

    #[test]
    fn font_size_tracks_value() {
        // Weights over a power-of-two total keep the sizes exact
        let words = vec![
            WordWeight::new("a", 10.0),
            WordWeight::new("b", 5.0),
            WordWeight::new("c", 1.0),
        ];
        let placed = run(&words, CanvasSize::new(800, 400), 7);

        let size_of = |text: &str| {
            placed
                .iter()
                .find(|p| p.text == text)
                .map(|p| p.font_size)
        };
        if let (Some(a), Some(b)) = (size_of("a"), size_of("b")) {
            assert!(a >= b);
        }
        if let (Some(b), Some(c)) = (size_of("b"), size_of("c")) {
            assert!(b >= c);
        }
        // 12 + (10/16)*60 = 49.5, 12 + (5/16)*60 = 30.75
        assert_eq!(size_of("a"), Some(49.5));
        assert_eq!(size_of("b"), Some(30.75));
    }

    #[test]
    fn largest_word_is_attempted_first() {
        let words = vec![
            WordWeight::new("small", 1.0),
            WordWeight::new("big", 9.0),
            WordWeight::new("medium", 4.0),
        ];
        for seed in 0..10 {
            let placed = run(&words, CanvasSize::new(800, 400), seed);
            assert_eq!(placed[0].text, "big");
            assert_eq!(placed[0].order, 0);
        }
    }

    #[test]
    fn ties_preserve_input_order() {
        let words = vec![
            WordWeight::new("first", 5.0),
            WordWeight::new("second", 5.0),
        ];
        let placed = run(&words, CanvasSize::new(800, 400), 3);
        assert_eq!(placed[0].text, "first");
    }

    #[test]
    fn registry_is_collision_free() {
        let words: Vec<WordWeight> = (0..30)
            .map(|i| WordWeight::new(format!("word{i}"), (i % 7 + 1) as f64))
            .collect();
        let p = params();
        let placed = run(&words, CanvasSize::new(800, 400), 42);

        for (i, a) in placed.iter().enumerate() {
            for b in placed.iter().skip(i + 1) {
                let dx = (a.x - b.x).abs();
                let dy = (a.y - b.y).abs();
                let overlap = dx < (a.width + b.width) / 2.0 + p.padding
                    && dy < (a.height + b.height) / 2.0 + p.padding;
                assert!(!overlap, "{} overlaps {}", a.text, b.text);
            }
        }
    }

    #[test]
    fn oversized_word_is_clamped_to_center() {
        // 40 chars at ~72px is far wider than 200px
        let words = vec![WordWeight::new("a".repeat(40), 10.0)];
        let placed = run(&words, CanvasSize::new(200, 400), 5);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].x, 100.0);
    }

    #[test]
    fn exhausted_budget_drops_word() {
        // Both words clamp to x = 100, and the 60px-tall canvas leaves
        // the y candidates within 8px of each other against a 47px
        // threshold, so the second word collides on every attempt.
        let words = vec![
            WordWeight::new("a".repeat(40), 10.0),
            WordWeight::new("b".repeat(40), 10.0),
        ];
        let placed = run(&words, CanvasSize::new(200, 60), 11);

        assert_eq!(placed.len(), 1);
        assert!(placed[0].text.starts_with('a'));
    }

    #[test]
    fn orders_follow_sorted_sequence() {
        let words = vec![
            WordWeight::new("c", 1.0),
            WordWeight::new("a", 9.0),
            WordWeight::new("b", 4.0),
        ];
        let placed = run(&words, CanvasSize::new(800, 400), 17);

        for p in &placed {
            let expected = match p.text.as_str() {
                "a" => 0,
                "b" => 1,
                _ => 2,
            };
            assert_eq!(p.order, expected, "order of {}", p.text);
        }
    }

    #[test]
    fn zero_attempt_budget_places_nothing() {
        let mut p = params();
        p.max_attempts = 0;
        let words = vec![WordWeight::new("a", 1.0)];
        let mut rng = pass_rng(Some(1));
        let placed = layout_words(&words, CanvasSize::new(800, 400), &p, &HeuristicMeasure, &mut rng);
        assert_eq!(placed, vec![]);
    }

    #[test]
    fn passes_are_independent_and_each_collision_free() {
        let words: Vec<WordWeight> = (0..20)
            .map(|i| WordWeight::new(format!("w{i}"), (20 - i) as f64))
            .collect();
        let p = params();

        for seed in [1u64, 2] {
            let placed = run(&words, CanvasSize::new(800, 400), seed);
            for (i, a) in placed.iter().enumerate() {
                for b in placed.iter().skip(i + 1) {
                    let clear = (a.x - b.x).abs() >= (a.width + b.width) / 2.0 + p.padding
                        || (a.y - b.y).abs() >= (a.height + b.height) / 2.0 + p.padding;
                    assert!(clear);
                }
            }
        }
    }

    #[test]
    fn same_seed_reproduces_the_pass() {
        let words: Vec<WordWeight> = (0..10)
            .map(|i| WordWeight::new(format!("w{i}"), (i + 1) as f64))
            .collect();
        let first = run(&words, CanvasSize::new(800, 400), 99);
        let second = run(&words, CanvasSize::new(800, 400), 99);
        assert_eq!(first, second);
    }

    #[test]
    fn spec_example_two_words() {
        let words = vec![WordWeight::new("A", 10.0), WordWeight::new("B", 0.0)];
        let placed = run(&words, CanvasSize::new(200, 400), 4);

        assert_eq!(placed[0].text, "A");
        assert_eq!(placed[0].font_size, 72.0);
        if let Some(b) = placed.iter().find(|p| p.text == "B") {
            assert_eq!(b.font_size, 12.0);
        }
    }

    #[test]
    fn heuristic_measure_is_deterministic() {
        let m = HeuristicMeasure;
        assert_eq!(m.width("abc", 10.0), 18.0);
        assert_eq!(m.width("", 30.0), 0.0);
    }
}
