//! Snack Drop entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, KeyboardEvent, TouchEvent};

    use snack_drop::Settings;
    use snack_drop::audio::{AudioManager, SoundEffect};
    use snack_drop::characters::{CHARACTERS, Character};
    use snack_drop::consts::*;
    use snack_drop::feedback::{FeedbackSource, TierTable};
    use snack_drop::sim::{GamePhase, GameState, RunEvent, TickInput, tick};

    /// Touch-and-hold repeat period in milliseconds
    const TOUCH_REPEAT_MS: i32 = 16;

    /// Game instance holding all state
    struct Game {
        state: Option<GameState>,
        character: Option<&'static Character>,
        input: TickInput,
        accumulator: f32,
        last_time: f64,
        settings: Settings,
        audio: AudioManager,
        /// DOM nodes for live items, keyed by entity id
        item_nodes: HashMap<u32, HtmlElement>,
        /// Touch-and-hold repeat timers; must be cancelled on release/teardown
        touch_timer_left: Option<i32>,
        touch_timer_right: Option<i32>,
        /// rAF chain stays alive while true
        running: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            Self {
                state: None,
                character: None,
                input: TickInput::default(),
                accumulator: 0.0,
                last_time: 0.0,
                settings,
                audio,
                item_nodes: HashMap::new(),
                touch_timer_left: None,
                touch_timer_right: None,
                running: true,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks from the frame's elapsed time
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                if let Some(state) = self.state.as_mut() {
                    let input = self.input.clone();
                    tick(state, &input);

                    // Clear one-shot inputs after processing
                    self.input.pause = false;
                    self.input.resume = false;
                }
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            let events = self
                .state
                .as_mut()
                .map(|s| s.drain_events())
                .unwrap_or_default();
            for event in events {
                self.handle_event(event);
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// React to one drained simulation event
        fn handle_event(&mut self, event: RunEvent) {
            match event {
                RunEvent::FoodEaten { .. } => self.audio.play(SoundEffect::Chomp),
                RunEvent::BombHit { .. } => self.audio.play(SoundEffect::Hurt),
                RunEvent::SizeUp => self.audio.play(SoundEffect::SizeUp),
                RunEvent::RunEnded { final_score } => {
                    self.audio.play(SoundEffect::GameOver);
                    self.show_game_over(final_score);
                }
            }
        }

        /// Transition to the game-over view with score and remark
        fn show_game_over(&self, final_score: u64) {
            let Some(document) = document() else { return };
            show_view(&document, "game-over");

            if let Some(el) = document.get_element_by_id("final-score") {
                el.set_text_content(Some(&final_score.to_string()));
            }
            if let Some(character) = self.character {
                if let Some(el) = document.get_element_by_id("played-as") {
                    el.set_text_content(Some(&format!("You played as {}", character.name)));
                }
                // The remark source is swappable; the tier table is the
                // default and needs no network
                if let Some(el) = document.get_element_by_id("remark") {
                    el.set_text_content(Some(&TierTable.feedback(character, final_score)));
                }
            }
        }

        /// Update HUD and field elements from the current snapshot
        fn render_frame(&mut self) {
            let Some(state) = &self.state else { return };
            let snapshot = state.snapshot();
            let Some(document) = document() else { return };

            // HUD
            if let Some(el) = document
                .query_selector("#hud-score .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(&snapshot.score.to_string()));
            }
            if let Some(el) = document
                .query_selector("#hud-lives .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(&"♥".repeat(snapshot.lives as usize)));
            }
            if self.settings.show_fps {
                if let Some(el) = document.get_element_by_id("hud-fps") {
                    el.set_text_content(Some(&self.fps.to_string()));
                }
            }

            // Player element: position, width, animation cues
            if let Some(el) = document.get_element_by_id("player") {
                if let Ok(el) = el.dyn_into::<HtmlElement>() {
                    let style = el.style();
                    let _ = style.set_property("left", &format!("{}%", snapshot.player.x));
                    let _ = style.set_property("width", &format!("{}%", snapshot.player.width));
                    let animate = !self.settings.reduced_motion;
                    let _ = el
                        .class_list()
                        .toggle_with_force("chomping", animate && snapshot.chomping);
                    let _ = el
                        .class_list()
                        .toggle_with_force("hurt", animate && snapshot.hurt_pulse);
                }
            }

            // Pause overlay
            if let Some(el) = document.get_element_by_id("pause-overlay") {
                let _ = el
                    .class_list()
                    .toggle_with_force("hidden", snapshot.phase != GamePhase::Paused);
            }

            // Item elements: create, move, and drop in id order
            if let Some(field) = document.get_element_by_id("field") {
                for item in &snapshot.items {
                    let node = self.item_nodes.entry(item.id).or_insert_with(|| {
                        let el = document
                            .create_element("div")
                            .expect("div creation cannot fail")
                            .dyn_into::<HtmlElement>()
                            .expect("div is an HtmlElement");
                        el.set_class_name("item");
                        el.set_text_content(Some(&item.glyph.to_string()));
                        let _ = field.append_child(&el);
                        el
                    });
                    let style = node.style();
                    let _ = style.set_property("left", &format!("{}%", item.x));
                    let _ = style.set_property("top", &format!("{}%", item.y));
                }

                let live: std::collections::HashSet<u32> =
                    snapshot.items.iter().map(|i| i.id).collect();
                self.item_nodes.retain(|id, node| {
                    if live.contains(id) {
                        true
                    } else {
                        node.remove();
                        false
                    }
                });
            }
        }

        /// Remove every item node from the field (run start/exit)
        fn clear_field(&mut self) {
            for (_, node) in self.item_nodes.drain() {
                node.remove();
            }
        }

        /// Cancel one touch-repeat timer
        fn clear_touch_timer(&mut self, left: bool) {
            let slot = if left {
                &mut self.touch_timer_left
            } else {
                &mut self.touch_timer_right
            };
            if let Some(handle) = slot.take() {
                if let Some(window) = web_sys::window() {
                    window.clear_interval_with_handle(handle);
                }
            }
        }

        /// Stop the rAF chain and cancel all timers (teardown)
        fn teardown(&mut self) {
            self.running = false;
            self.clear_touch_timer(true);
            self.clear_touch_timer(false);
        }
    }

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    /// Show exactly one of the top-level views
    fn show_view(document: &Document, id: &str) {
        for view in ["menu", "game", "game-over"] {
            if let Some(el) = document.get_element_by_id(view) {
                let _ = el.class_list().toggle_with_force("hidden", view != id);
            }
        }
    }

    /// Begin a fresh run with the chosen character
    fn start_run(game: &Rc<RefCell<Game>>, character: &'static Character) {
        let seed = js_sys::Date::now() as u64;
        let mut g = game.borrow_mut();
        g.clear_field();
        g.state = Some(GameState::new(seed, character));
        g.character = Some(character);
        g.input = TickInput::default();
        g.accumulator = 0.0;
        g.audio.resume();

        if let Some(document) = document() {
            show_view(&document, "game");
            if let Some(field) = document.get_element_by_id("field") {
                let _ = field.set_attribute("class", &format!("field {}", character.theme));
            }
            if let Some(el) = document.get_element_by_id("player") {
                el.set_text_content(Some(&character.glyph.to_string()));
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Snack Drop starting...");

        let settings = Settings::load();
        let game = Rc::new(RefCell::new(Game::new(settings)));

        let Some(document) = document() else {
            log::error!("no document - cannot start");
            return;
        };

        build_menu(&document, game.clone());
        setup_keyboard(game.clone());
        setup_touch_controls(&document, game.clone());
        setup_buttons(&document, game.clone());
        setup_auto_pause(game.clone());
        setup_teardown(game.clone());

        show_view(&document, "menu");
        request_animation_frame(game);

        log::info!("Snack Drop running!");
    }

    /// Build one select card per catalog character
    fn build_menu(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(container) = document.get_element_by_id("character-cards") else {
            return;
        };
        for character in CHARACTERS.iter() {
            let Ok(card) = document.create_element("button") else {
                continue;
            };
            card.set_class_name(&format!("character-card {}", character.theme));
            card.set_inner_html(&format!(
                "<span class=\"card-glyph\">{}</span><h3>{}</h3><p>{}</p>",
                character.glyph, character.name, character.description
            ));

            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                start_run(&game, character);
            });
            let _ = card.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();

            let _ = container.append_child(&card);
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Held keys latch direction flags; the tick polls them
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" => g.input.left = true,
                    "ArrowRight" | "d" => g.input.right = true,
                    "Escape" => g.input.pause = true,
                    "Enter" => g.input.resume = true,
                    _ => {}
                }
                g.audio.resume();
            });
            let _ =
                window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" => g.input.left = false,
                    "ArrowRight" | "d" => g.input.right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch_controls(document: &Document, game: Rc<RefCell<Game>>) {
        setup_touch_zone(document, game.clone(), "touch-left", true);
        setup_touch_zone(document, game, "touch-right", false);
    }

    /// One half-screen hold zone. Holding re-asserts the direction latch on a
    /// fixed-interval timer; release and teardown cancel the timer.
    fn setup_touch_zone(document: &Document, game: Rc<RefCell<Game>>, id: &str, left: bool) {
        let Some(zone) = document.get_element_by_id(id) else {
            return;
        };

        // The repeating callback lives for the page's lifetime
        let repeat: Rc<Closure<dyn FnMut()>> = {
            let game = game.clone();
            Rc::new(Closure::new(move || {
                let mut g = game.borrow_mut();
                if left {
                    g.input.left = true;
                } else {
                    g.input.right = true;
                }
            }))
        };

        {
            let game = game.clone();
            let repeat = repeat.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if left {
                    g.input.left = true;
                } else {
                    g.input.right = true;
                }
                g.audio.resume();

                let already_running = if left {
                    g.touch_timer_left.is_some()
                } else {
                    g.touch_timer_right.is_some()
                };
                if !already_running {
                    if let Some(window) = web_sys::window() {
                        if let Ok(handle) = window
                            .set_interval_with_callback_and_timeout_and_arguments_0(
                                repeat.as_ref().as_ref().unchecked_ref(),
                                TOUCH_REPEAT_MS,
                            )
                        {
                            if left {
                                g.touch_timer_left = Some(handle);
                            } else {
                                g.touch_timer_right = Some(handle);
                            }
                        }
                    }
                }
            });
            let _ = zone
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if left {
                    g.input.left = false;
                } else {
                    g.input.right = false;
                }
                g.clear_touch_timer(left);
            });
            let _ =
                zone.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            let _ = zone
                .add_event_listener_with_callback("touchcancel", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        // Pause button toggles via the idempotent command pair
        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                match g.state.as_ref().map(|s| s.phase) {
                    Some(GamePhase::Running) => g.input.pause = true,
                    Some(GamePhase::Paused) => g.input.resume = true,
                    _ => {}
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.resume = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Play again keeps the character, fresh state
        if let Some(btn) = document.get_element_by_id("play-again-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let character = game.borrow().character;
                if let Some(character) = character {
                    start_run(&game, character);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Back to character select
        if let Some(btn) = document.get_element_by_id("menu-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.clear_field();
                g.state = None;
                g.character = None;
                drop(g);
                if let Some(document) = document() {
                    show_view(&document, "menu");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.as_ref().map(|s| s.phase) == Some(GamePhase::Running) {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.as_ref().map(|s| s.phase) == Some(GamePhase::Running) {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Unmute on focus
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }
    }

    /// Leaving the page cancels the rAF chain and any repeat timers
    fn setup_teardown(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().teardown();
        });
        let _ =
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_going = {
            let mut g = game.borrow_mut();
            if g.running {
                let dt = if g.last_time > 0.0 {
                    ((time - g.last_time) / 1000.0) as f32
                } else {
                    SIM_DT
                };
                g.last_time = time;

                g.update(dt, time);
                g.render_frame();
                true
            } else {
                false
            }
        };

        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use snack_drop::characters::{CHARACTERS, Character};
    use snack_drop::consts::*;
    use snack_drop::feedback::{FeedbackSource, TierTable};
    use snack_drop::sim::{GamePhase, GameState, RunEvent, TickInput, tick};

    env_logger::init();
    log::info!("Snack Drop (native) starting...");

    // Headless demo: a seeded run driven by a scripted input sweep, two
    // simulated minutes at most. The browser build is the playable one.
    let character = &CHARACTERS[0];
    let mut state = GameState::new(0xC0FFEE, character);

    let mut i: u32 = 0;
    while state.phase != GamePhase::Ended && state.time_ticks < (TICK_HZ as u64) * 120 {
        // Sweep back and forth across the field
        let input = TickInput {
            left: (i / 90) % 2 == 1,
            right: (i / 90) % 2 == 0,
            ..Default::default()
        };
        tick(&mut state, &input);

        for event in state.drain_events() {
            match event {
                RunEvent::FoodEaten { score } => log::info!("chomp! score={score}"),
                RunEvent::BombHit { lives } => log::info!("ouch! lives={lives}"),
                RunEvent::SizeUp => log::info!("size-up!"),
                RunEvent::RunEnded { final_score } => log::info!("run over, score={final_score}"),
            }
        }
        i += 1;
    }

    let snapshot = state.snapshot();
    println!(
        "demo run finished: score={} lives={} ticks={}",
        snapshot.score, snapshot.lives, state.time_ticks
    );
    if let Some(character) = Character::by_id(&state.character_id) {
        println!("{}", TierTable.feedback(character, snapshot.score));
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
