use skyline3d::catalog::City;
use skyline3d::graphics::Canvas;
use skyline3d::primitive::Primitive;
use skyline3d::render::build_frame;
use skyline3d::state::{SceneConfig, SceneState};
use skyline3d::weather::WeatherMode;

fn state(city: City, weather: WeatherMode) -> SceneState {
    SceneState::new(&SceneConfig {
        city,
        weather,
        ..SceneConfig::default()
    })
}

#[test]
fn every_city_renders_in_every_weather() {
    for city in City::ALL {
        for weather in WeatherMode::ALL {
            let mut s = state(city, weather);
            for _ in 0..5 {
                s.tick();
            }
            let frame = build_frame(&s);
            assert!(
                matches!(frame.primitives.first(), Some(Primitive::SkyGradient(_))),
                "{city} {weather}: sky first"
            );
            assert!(frame.stats.objects > 0, "{city} {weather}: no objects");
            assert!(frame.stats.segments > 0, "{city} {weather}: no segments");

            let mut canvas = Canvas::new(80, 24, &s.viewport);
            canvas.draw_frame(&frame);
            let mut out: Vec<u8> = Vec::new();
            assert_eq!(canvas.flush(&mut out).unwrap(), 80 * 24);
            assert!(!out.is_empty());
        }
    }
}

#[test]
fn animation_only_redraws_what_moved() {
    let mut s = state(City::Sydney, WeatherMode::Rain);
    let mut canvas = Canvas::new(80, 24, &s.viewport);
    canvas.draw_frame(&build_frame(&s));
    canvas.flush(&mut Vec::<u8>::new()).unwrap();

    s.toggle_pause();
    s.tick();
    canvas.draw_frame(&build_frame(&s));
    assert_eq!(canvas.flush(&mut Vec::<u8>::new()).unwrap(), 0);

    s.toggle_pause();
    s.tick();
    canvas.draw_frame(&build_frame(&s));
    let changed = canvas.flush(&mut Vec::<u8>::new()).unwrap();
    assert!(changed > 0 && changed < 80 * 24);
}

#[test]
fn storm_flashes_and_clears() {
    let mut s = state(City::NewYork, WeatherMode::Storm);
    let mut ticks = 0;
    while !s.weather.lightning.is_flashing() {
        s.tick();
        ticks += 1;
        assert!(ticks < 3000, "no lightning after {ticks} ticks");
    }
    let frame = build_frame(&s);
    assert!(frame
        .primitives
        .iter()
        .any(|p| matches!(p, Primitive::Flash { .. })));

    s.set_weather(WeatherMode::Clear);
    let window = s.weather.tuning.max_flash_window();
    for _ in 0..=window {
        s.tick();
    }
    assert!(!s.weather.lightning.is_flashing());
    let frame = build_frame(&s);
    assert!(!frame
        .primitives
        .iter()
        .any(|p| matches!(p, Primitive::Flash { .. })));
}

#[test]
fn same_seed_same_frames() {
    let mut a = state(City::Tokyo, WeatherMode::Snow);
    let mut b = state(City::Tokyo, WeatherMode::Snow);
    for _ in 0..50 {
        a.tick();
        b.tick();
    }
    assert_eq!(build_frame(&a).primitives, build_frame(&b).primitives);
}
