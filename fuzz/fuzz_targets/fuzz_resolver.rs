#![no_main]

use arbitrary::Arbitrary;
use fieldnav::{GeometryProbe, NavRequest, NavigationOutcome, NavigationResolver, PanelMetrics};
use fieldnav_core::{Direction, NavConfig, Rect};
use fieldnav_harness::ScriptedHost;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Control {
    x: i16,
    y: i16,
    width: u16,
    height: u8,
    focusable: bool,
}

#[derive(Debug, Arbitrary)]
struct Input {
    controls: Vec<Control>,
    before: u8,
    end_slack: i8,
    focus: u8,
    direction: u8,
    panel_width: u16,
    panel_height: u16,
    header: u8,
    prefix: u8,
    abort_threshold: u8,
}

fuzz_target!(|input: Input| {
    if input.controls.is_empty() || input.controls.len() > 256 {
        return;
    }
    let before = u64::from(input.before);
    let mut host = ScriptedHost::new();
    for (i, c) in input.controls.iter().enumerate() {
        let rect = Rect::new(
            f32::from(c.x),
            f32::from(c.y),
            f32::from(c.width),
            f32::from(c.height),
        );
        host.insert(before + 1 + i as u64, rect, c.focusable);
    }

    let from = before + 1 + u64::from(input.focus) % input.controls.len() as u64;
    let direction = Direction::ALL[usize::from(input.direction % 4)];
    let last = before + input.controls.len() as u64;
    let approx_end = last.saturating_add_signed(i64::from(input.end_slack));
    let panel = PanelMetrics::new(f32::from(input.panel_width), f32::from(input.panel_height))
        .with_header_height(f32::from(input.header))
        .with_prefix_width(f32::from(input.prefix));
    let request = NavRequest {
        direction,
        previous_rect: host.rect_of(from),
        before_boundary_id: before,
        approx_end_id: approx_end,
        panel,
    };
    let resolver = NavigationResolver::new(
        NavConfig::default().with_abort_threshold(u32::from(input.abort_threshold)),
    );

    host.focus(from);
    let outcome = resolver.next(&mut host, &request);

    // Post-conditions that must always hold:
    assert_eq!(host.active(), from, "cursor not restored");
    let config = resolver.config();
    let probed = host.probed();
    assert!(
        probed.len() as u64 <= config.first_pass_span + config.second_pass_widening,
        "probe budget exceeded"
    );
    if let NavigationOutcome::Focus(id) = outcome {
        assert!(id > before, "focused an id before the panel");
        assert!(host.can_receive_focus(id), "focused an unfocusable id");
        assert!(
            resolver.bounds(&panel).contains_rect(&host.rect_of(id)),
            "focused a control outside the panel"
        );
    }
});
