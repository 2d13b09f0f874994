use web_sys::CanvasRenderingContext2d;

use super::state::{CanvasState, NodeBox, clip_to_box};
use crate::graph::Point;

const BACKGROUND: &str = "#1a1a2e";
const FONT_SIZE: f64 = 12.0;
const LINE_HEIGHT: f64 = 15.0;
const TEXT_PADDING: f64 = 8.0;
const ARROW_SIZE: f64 = 9.0;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(state.hover.highlight_t);
	let has_highlight = state.has_active_highlight();

	for edge in &state.edges {
		let (from, to) = (&state.nodes[edge.source], &state.nodes[edge.target]);
		let start = clip_to_box(from.center(), from.width, from.height, to.center());
		let tip = clip_to_box(to.center(), to.width, to.height, from.center());
		let (dx, dy) = (tip.x - start.x, tip.y - start.y);
		let dist = dx.hypot(dy);
		if dist < 0.001 {
			continue;
		}

		let touches_hovered = state.is_hovered(edge.source) || state.is_hovered(edge.target);
		let lit = has_highlight && touches_hovered;
		let alpha = if lit {
			0.7 + 0.3 * t
		} else {
			0.7 - 0.5 * t
		};
		let color = format!("rgba(100, 180, 255, {alpha})");

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.set_stroke_style_str(&color);
		ctx.set_line_width(if lit { 1.5 + t } else { 1.5 });
		ctx.begin_path();
		ctx.move_to(start.x, start.y);
		ctx.line_to(tip.x - ux * ARROW_SIZE, tip.y - uy * ARROW_SIZE);
		ctx.stroke();

		let (back_x, back_y) = (tip.x - ux * ARROW_SIZE, tip.y - uy * ARROW_SIZE);
		let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
		ctx.set_fill_style_str(&color);
		ctx.begin_path();
		ctx.move_to(tip.x, tip.y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		if !edge.label.is_empty() {
			draw_edge_label(ctx, &edge.label, midpoint(start, tip), alpha);
		}
	}
}

fn midpoint(a: Point, b: Point) -> Point {
	Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

fn draw_edge_label(ctx: &CanvasRenderingContext2d, label: &str, at: Point, alpha: f64) {
	ctx.set_font(&format!("{}px sans-serif", FONT_SIZE - 2.0));
	let width = ctx.measure_text(label).map(|m| m.width()).unwrap_or(0.0);
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(
		at.x - width / 2.0 - 3.0,
		at.y - FONT_SIZE / 2.0 - 1.0,
		width + 6.0,
		FONT_SIZE + 2.0,
	);
	ctx.set_fill_style_str(&format!("rgba(200, 220, 255, {alpha})"));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(label, at.x, at.y);
}

fn draw_nodes(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
	);

	ctx.set_font(&format!("{FONT_SIZE}px sans-serif"));
	for (idx, node) in state.nodes.iter().enumerate() {
		let alpha = if has_highlight && !state.is_highlighted(idx) {
			1.0 - 0.7 * t
		} else {
			1.0
		};
		ctx.set_global_alpha(alpha);

		ctx.set_fill_style_str("#24243e");
		ctx.fill_rect(node.x, node.y, node.width, node.height);
		ctx.set_stroke_style_str(node.color);
		ctx.set_line_width(if state.is_hovered(idx) { 2.0 + 1.5 * t } else { 2.0 });
		ctx.stroke_rect(node.x, node.y, node.width, node.height);

		draw_title(ctx, node);
		ctx.set_global_alpha(1.0);
	}
}

fn draw_title(ctx: &CanvasRenderingContext2d, node: &NodeBox) {
	let max_width = node.width - 2.0 * TEXT_PADDING;
	let max_lines = ((node.height - 2.0 * TEXT_PADDING) / LINE_HEIGHT).floor().max(1.0) as usize;
	let lines = wrap_text(&node.title, max_width, max_lines, |s| {
		ctx.measure_text(s).map(|m| m.width()).unwrap_or(0.0)
	});

	let center = node.center();
	let top = center.y - (lines.len() as f64 - 1.0) * LINE_HEIGHT / 2.0;
	ctx.set_fill_style_str("white");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, center.x, top + i as f64 * LINE_HEIGHT);
	}
}

/// Greedy word wrap to at most `max_lines` lines; overflow ends with an ellipsis.
pub fn wrap_text(
	text: &str,
	max_width: f64,
	max_lines: usize,
	measure: impl Fn(&str) -> f64,
) -> Vec<String> {
	let mut lines: Vec<String> = Vec::new();
	let mut current = String::new();
	for word in text.split_whitespace() {
		let candidate = if current.is_empty() {
			word.to_string()
		} else {
			format!("{current} {word}")
		};
		if current.is_empty() || measure(&candidate) <= max_width {
			current = candidate;
			continue;
		}
		lines.push(std::mem::take(&mut current));
		current = word.to_string();
		if lines.len() == max_lines {
			let last = lines.pop().unwrap_or_default();
			lines.push(ellipsize(&last, max_width, &measure));
			return lines;
		}
	}
	if !current.is_empty() {
		lines.push(current);
	}
	if let Some(last) = lines.last_mut() {
		if measure(last) > max_width {
			*last = ellipsize(last, max_width, &measure);
		}
	}
	lines
}

fn ellipsize(line: &str, max_width: f64, measure: &impl Fn(&str) -> f64) -> String {
	let mut chars: Vec<char> = line.chars().collect();
	loop {
		let candidate: String = chars.iter().collect::<String>() + "…";
		if chars.is_empty() || measure(&candidate) <= max_width {
			return candidate;
		}
		chars.pop();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	// one unit per char
	fn measure(s: &str) -> f64 {
		s.chars().count() as f64
	}

	#[test]
	fn short_titles_stay_on_one_line() {
		assert_eq!(wrap_text("Amen Brother", 20.0, 3, measure), ["Amen Brother"]);
	}

	#[test]
	fn long_titles_wrap_at_words() {
		assert_eq!(
			wrap_text("Straight Outta Compton by N.W.A.", 15.0, 3, measure),
			["Straight Outta", "Compton by", "N.W.A."]
		);
	}

	#[test]
	fn overflow_gets_an_ellipsis() {
		assert_eq!(
			wrap_text("one two three four five six", 9.0, 2, measure),
			["one two", "three…"]
		);
	}

	#[test]
	fn single_long_word_is_truncated() {
		assert_eq!(wrap_text("Supercalifragilistic", 6.0, 2, measure), ["Super…"]);
	}

	#[test]
	fn blank_title_has_no_lines() {
		assert!(wrap_text("   ", 10.0, 2, measure).is_empty());
	}
}
