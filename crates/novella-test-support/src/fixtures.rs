//! Story books used across test suites, as YAML.

/// A hallway with a branch point.
///
/// - Scene 1 (hallway): two lines, then a choice line for group 1.
///   Option 1 "Go upstairs" sets event 1 and leads to scene 2; option 2
///   "Go downstairs" leads to scene 3.
/// - Scene 2 (stairs): no lines, defaults to scene 4.
/// - Scene 3 (cellar): one line with a sprite, defaults to scene 5.
/// - Scene 4 (attic): one line, no default.
/// - Scene 5 (void): no lines, no rules, no default.
pub const SCENARIO_BOOK: &str = r#"
locations:
  - { id: 1, name: Hallway, background_path: bg/hallway.png }
  - { id: 2, name: Attic, background_path: bg/attic.png }
  - { id: 3, name: Cellar, background_path: bg/cellar.png }
characters:
  - { id: 1, name: Mira, color: 88CCFF }
  - { id: 2, name: Narrator }
sprites:
  - { id: 1, character_id: 1, expression: worried, asset_path: sprites/mira_worried.png }
events:
  - { id: 1, name: Went Upstairs }
scenes:
  - { id: 1, name: Hallway, location_id: 1 }
  - { id: 2, name: Stairs, default_next_scene_id: 4 }
  - { id: 3, name: Cellar, location_id: 3, default_next_scene_id: 5 }
  - { id: 4, name: Attic, location_id: 2 }
  - { id: 5, name: Void }
lines:
  - { id: 1, scene_id: 1, sequence: 1, speaker_id: 2, text: "The lights flicker." }
  - { id: 2, scene_id: 1, sequence: 2, speaker_id: 2, text: "Something moves upstairs." }
  - { id: 3, scene_id: 1, sequence: 3, speaker_id: 1, text: "Where should we go?", choice_group_id: 1 }
  - { id: 4, scene_id: 3, sequence: 1, speaker_id: 1, text: "The cellar smells of earth.", sprite_id: 1 }
  - { id: 5, scene_id: 4, sequence: 1, speaker_id: 1, text: "The attic is freezing." }
choices:
  - { id: 1, group_id: 1, text: "Go upstairs", to_scene_id: 2, event_id: 1 }
  - { id: 2, group_id: 1, text: "Go downstairs", to_scene_id: 3 }
"#;

/// Three linear lines, then a guarded transition.
///
/// Scene 1 defaults to scene 2 ("epilogue", garden background) but goes to
/// scene 3 ("secret ending") when event 1 is set. Scene 2 ends the story.
pub const LINEAR_BOOK: &str = r#"
locations:
  - { id: 1, name: Garden, background_path: bg/garden.png }
characters:
  - { id: 1, name: Narrator }
events:
  - { id: 1, name: Knows Secret }
scenes:
  - { id: 1, name: Intro, default_next_scene_id: 2 }
  - { id: 2, name: Epilogue, location_id: 1 }
  - { id: 3, name: Secret }
lines:
  - { id: 1, scene_id: 1, sequence: 1, speaker_id: 1, text: "one" }
  - { id: 2, scene_id: 1, sequence: 2, speaker_id: 1, text: "two" }
  - { id: 3, scene_id: 1, sequence: 3, speaker_id: 1, text: "three" }
  - { id: 4, scene_id: 2, sequence: 1, speaker_id: 1, text: "epilogue" }
  - { id: 5, scene_id: 3, sequence: 1, speaker_id: 1, text: "secret ending" }
transitions:
  - { from_scene_id: 1, to_scene_id: 3, event_id: 1 }
"#;

/// Scene 1 shows one line and then defaults to a scene that does not exist.
pub const BROKEN_BOOK: &str = r#"
characters:
  - { id: 1, name: Narrator }
scenes:
  - { id: 1, name: Dead End, default_next_scene_id: 404 }
lines:
  - { id: 1, scene_id: 1, sequence: 1, speaker_id: 1, text: "dead end ahead" }
"#;

/// Two empty scenes defaulting to each other.
pub const CYCLE_BOOK: &str = r"
scenes:
  - { id: 1, name: Loop A, default_next_scene_id: 2 }
  - { id: 2, name: Loop B, default_next_scene_id: 1 }
";

/// A choice that raises a flag checked one scene later.
///
/// Scene 1 opens on a choice: option 1 "Take the key" sets event 1, option 2
/// "Leave it" does not; both lead to scene 2. Scene 2 shows one line and
/// defaults to scene 3 ("epilogue"), or goes to scene 4 ("secret ending")
/// when event 1 is set.
pub const KEY_BOOK: &str = r#"
characters:
  - { id: 1, name: Narrator }
events:
  - { id: 1, name: Has Key }
scenes:
  - { id: 1, name: Desk }
  - { id: 2, name: Door, default_next_scene_id: 3 }
  - { id: 3, name: Epilogue }
  - { id: 4, name: Secret }
lines:
  - { id: 1, scene_id: 1, sequence: 1, speaker_id: 1, text: "A key lies on the desk.", choice_group_id: 1 }
  - { id: 2, scene_id: 2, sequence: 1, speaker_id: 1, text: "the door" }
  - { id: 3, scene_id: 3, sequence: 1, speaker_id: 1, text: "epilogue" }
  - { id: 4, scene_id: 4, sequence: 1, speaker_id: 1, text: "secret ending" }
choices:
  - { id: 1, group_id: 1, text: "Take the key", to_scene_id: 2, event_id: 1 }
  - { id: 2, group_id: 1, text: "Leave it", to_scene_id: 2 }
transitions:
  - { from_scene_id: 2, to_scene_id: 4, event_id: 1 }
"#;
