use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use stepscroll::features::reveal::RevealKind;
use stepscroll::{AnimatedSink, Bounds, Config, Container, ElementRef, Page, StepLayout, UiEvent, Viewport};

const FRAME: f32 = 1.0 / 60.0;

/// Scrolls a simulated page and logs what the stepped procedure shows.
#[derive(Debug, Parser)]
#[command(name = "stepscroll", version)]
struct Args {
    #[arg(long, default_value_t = 1440)]
    viewport_width: u32,

    #[arg(long, default_value_t = 900)]
    viewport_height: u32,

    /// Lines per step, comma separated.
    #[arg(long, value_delimiter = ',', default_value = "2,2,2,2")]
    lines: Vec<usize>,

    /// Simulated frames.
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Config file; defaults to the user config directory.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> Config {
    let loaded = match path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    loaded.unwrap_or_else(|e| {
        warn!("using default config: {e:#}");
        Config::default()
    })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(args.config.as_ref());
    let viewport = Viewport::new(args.viewport_width, args.viewport_height);
    let vh = args.viewport_height as f32;
    let sink = AnimatedSink::from_config(&config);
    let mut page = Page::new(config, viewport, sink);

    // Hero, an intro block, the method list (one viewport per step), a closing block.
    let layout = StepLayout::new(args.lines.clone());
    let method_top = vh * 2.0;
    let method_height = vh * layout.total_steps().max(1) as f32;
    let hero = Container::new("hero", Bounds::new(0.0, vh));
    let intro = Container::new("intro", Bounds::new(vh * 1.2, vh * 0.5));
    let method = Container::new("method_list", Bounds::new(method_top, method_height));
    let outro = Container::new("outro", Bounds::new(method_top + method_height + vh * 0.5, vh));
    let page_end = outro.bounds.top + outro.bounds.height;

    page.mount_parallax(&hero, Some("0.5"))?;
    page.mount_reveal(&intro, RevealKind::FadeUp)?;
    page.mount_reveal(&outro, RevealKind::Stagger { items: 3 })?;
    let steps = page
        .mount_method_steps(Some(&method), layout)
        .context("mounting method steps")?;

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut last_active = None;
    for tick in 0..args.ticks {
        // Mostly downward wheel deltas with the occasional fling back up.
        let delta: f32 = if rng.gen_bool(0.08) {
            -rng.gen_range(200.0..900.0)
        } else {
            rng.gen_range(-20.0..60.0)
        };
        let target = (page.scroll_y() + delta).clamp(0.0, page_end);
        page.handle_event(UiEvent::ScrollTo { y: target });
        page.update(FRAME);
        page.sink_mut().advance(page.time());

        let Some(steps) = &steps else {
            continue;
        };
        let active = steps.borrow().active_index();
        if active != last_active || tick % 60 == 0 {
            let steps = steps.borrow();
            let sink = page.sink();
            let fills: Vec<String> = (0..steps.layout().total_steps())
                .map(|step| {
                    (0..steps.layout().lines_in(step))
                        .map(|line| format!("{:.2}", sink.fill(ElementRef::Line { step, line })))
                        .collect::<Vec<_>>()
                        .join("/")
                })
                .collect();
            info!(
                "t={:.2}s y={:.0} active={:?} opacity={:.2} fills=[{}]",
                page.time(),
                page.scroll_y(),
                active,
                active.map_or(0.0, |i| sink.opacity(ElementRef::Step(i))),
                fills.join(" ")
            );
            last_active = active;
        }
    }

    if steps.is_none() {
        info!("stepped procedure inactive at {}px", args.viewport_width);
    }
    page.teardown();
    Ok(())
}
