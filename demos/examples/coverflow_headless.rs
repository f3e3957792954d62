// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drives a coverflow engine without a window: drag, fling, tap, select, and a data change.
//!
//! Each printed line is one frame: the offset, then every drawn item in paint
//! order as `index@slot` with its scale.
//!
//! Run:
//! - `RUST_LOG=understory_coverflow=debug cargo run -p understory_coverflow_demos --example coverflow_headless`

use kurbo::{Insets, Point};
use understory_coverflow::{
    CoverFlowConfig, CoverFlowEngine, CoverFlowEvent, FixedMemoryBudget, HeightConstraint,
    PointerEvent, Viewport,
};
use understory_coverflow_demos::{Album, Mirror};

type Engine = CoverFlowEngine<Album, Mirror>;

fn print_frame(engine: &mut Engine) {
    let frame = engine.frame();
    let items: Vec<String> = frame
        .items
        .iter()
        .map(|item| format!("{}@{:+} x{:.2}", item.index, item.slot, item.transform.scale))
        .collect();
    println!("offset {:>7.3} | {}", frame.offset, items.join("  "));
}

fn report_events(engine: &mut Engine) {
    for event in engine.drain_events() {
        match event {
            CoverFlowEvent::FrameRendered => {}
            CoverFlowEvent::ItemCentered { index, rect } => {
                println!("  centered item {index} at {rect:?}");
            }
            CoverFlowEvent::ItemTapped(index) => println!("  tapped item {index}"),
            CoverFlowEvent::ItemLongPressed(index) => println!("  long-pressed item {index}"),
            CoverFlowEvent::RequestExclusive(claim) => {
                println!("  {} pointer priority", if claim { "claim" } else { "release" });
            }
        }
    }
}

/// Ticks at 60 Hz until motion stops, printing every fourth frame.
fn run_until_idle(engine: &mut Engine, mut now: u64) -> u64 {
    let mut frame = 0;
    while engine.is_animating() {
        now += 16;
        if engine.tick(now) && frame % 4 == 0 {
            print_frame(engine);
        }
        frame += 1;
    }
    print_frame(engine);
    report_events(engine);
    now
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = CoverFlowConfig::default()
        .with_visible_count(5)
        .with_reflection_height_percent(25)
        .with_reflection_gap(4.0)
        .with_long_press_enabled(true);
    let mut engine = match Engine::new(
        Album::new(12),
        Mirror::default(),
        config,
        &FixedMemoryBudget(256 << 20),
    ) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("cannot create coverflow: {err}");
            return;
        }
    };
    let viewport = Viewport::new(800.0, HeightConstraint::AtMost(600.0))
        .with_padding(Insets::new(16.0, 8.0, 16.0, 8.0));
    if let Err(err) = engine.set_viewport(viewport) {
        eprintln!("bad viewport: {err}");
        return;
    }
    if let Some(measured) = engine.layout() {
        println!("measured {:?}, band {}", measured.size, measured.child_height);
    }

    println!("-- initial");
    print_frame(&mut engine);
    report_events(&mut engine);

    println!("-- drag left and release");
    let mut now = 1_000;
    engine.on_pointer(PointerEvent::down(Point::new(600.0, 200.0), now));
    for step in 1..=6 {
        now += 16;
        let x = 600.0 - f64::from(step) * 40.0;
        engine.on_pointer(PointerEvent::moved(Point::new(x, 202.0), now));
    }
    print_frame(&mut engine);
    now += 16;
    engine.on_pointer(PointerEvent::up(Point::new(360.0, 202.0), now));
    now = run_until_idle(&mut engine, now);

    println!("-- tap the centered item");
    if let Some(rect) = engine.touch_rect() {
        let center = rect.center();
        engine.on_pointer(PointerEvent::down(center, now));
        engine.on_pointer(PointerEvent::up(center, now + 80));
        report_events(&mut engine);

        println!("-- hold it");
        now += 200;
        engine.on_pointer(PointerEvent::down(center, now));
        engine.tick(now + 600);
        engine.on_pointer(PointerEvent::up(center, now + 650));
        report_events(&mut engine);
        now += 650;
    }

    println!("-- vertical swipe goes to the parent");
    engine.on_pointer(PointerEvent::down(Point::new(400.0, 100.0), now));
    let consumed = engine.on_pointer(PointerEvent::moved(Point::new(408.0, 160.0), now + 16));
    engine.on_pointer(PointerEvent::up(Point::new(408.0, 220.0), now + 32));
    println!("  move consumed: {consumed}");
    report_events(&mut engine);
    now += 32;

    println!("-- select item 9");
    if let Err(err) = engine.set_selection(9, now) {
        eprintln!("selection failed: {err}");
    }
    now = run_until_idle(&mut engine, now);

    println!("-- remove three covers");
    for _ in 0..3 {
        engine.source_mut().pop();
    }
    match engine.notify_data_changed() {
        Ok(()) => print_frame(&mut engine),
        Err(err) => eprintln!("data change rejected: {err}"),
    }
    report_events(&mut engine);

    let stats = engine.cache_stats();
    println!(
        "reflections: {} cached, {} hits, {} misses, {} evictions",
        stats.entries, stats.hits, stats.misses, stats.evictions
    );
    engine.detach();
    tracing::info!(now, "demo finished");
}
