use cupid_game::{
    CHARACTERS, GameConfig, GameData, Phase, PromptDeck, PromptLibrary, character_by_id,
    route_for_phase, route_for_phase_name,
};

#[test]
fn bundled_prompt_assets_are_leveled_and_nonempty() {
    let library = PromptLibrary::bundled().unwrap();
    for level in 1..=3 {
        let dares = library.dares.pool_for(level);
        let punishments = library.punishments.pool_for(level);
        assert!(!dares.is_empty(), "no dares at level {level}");
        assert!(!punishments.is_empty(), "no punishments at level {level}");
        assert!(dares.len() < library.dares.len());
        assert!(dares.iter().all(|d| !d.trim().is_empty()));
    }
    assert!(library.events.len() >= 3);
}

#[test]
fn alternate_prompt_shapes_normalize() {
    let flat = PromptDeck::from_json("dares", r#"["only", "flat"]"#).unwrap();
    assert_eq!(flat.pool_for(3), flat.all());
    let odd = PromptDeck::from_json("dares", r#"{"levels": 3}"#).unwrap();
    assert!(odd.is_empty());
    let number = PromptDeck::from_json("dares", "17").unwrap();
    assert!(number.is_empty());
}

#[test]
fn every_phase_maps_to_a_route() {
    let routes: Vec<_> = Phase::ALL.iter().map(|p| route_for_phase(*p)).collect();
    assert_eq!(
        routes,
        vec![
            "/",
            "/pregame",
            "/roulette",
            "/round",
            "/proof",
            "/punishment",
            "/safe-skip",
            "/event",
            "/LeaderScreen"
        ]
    );
    assert_eq!(route_for_phase_name("awards"), "/");
    assert_eq!(route_for_phase_name("safe-skip"), "/safe-skip");
}

#[test]
fn characters_cover_the_catalog() {
    assert_eq!(CHARACTERS.len(), 5);
    for character in &CHARACTERS {
        assert_eq!(character_by_id(character.id), Some(character));
    }
}

#[test]
fn config_and_state_snapshots_serialize() {
    let cfg: GameConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(cfg, GameConfig::default());

    let data = GameData::default();
    let json = serde_json::to_string(&data).unwrap();
    assert!(json.contains("\"phase\":\"setup\""));
    assert!(json.contains("\"bg_music_enabled\":true"));
    let back: GameData = serde_json::from_str(&json).unwrap();
    assert_eq!(back, data);
}
