use cupid_game::{
    FixedRandom, GameConfig, GameStore, NewPlayer, Phase, PromptLibrary, RandomSource,
    RngBundle, RollStream, SkipRollResult, calculate_skip_chances, roulette_weights, spin,
};

const SAMPLE_SIZE: usize = 20_000;
const TOLERANCE: f64 = 0.02;

fn ratio(count: usize, total: usize) -> f64 {
    f64::from(u32::try_from(count).unwrap()) / f64::from(u32::try_from(total).unwrap())
}

fn roster_store<R: RandomSource>(rng: R) -> GameStore<R> {
    let mut store = GameStore::new(GameConfig::default(), PromptLibrary::empty(), rng);
    for (name, character) in [("Aria", "victim-1"), ("Jules", "victim-2"), ("Mika", "victim-3")] {
        store
            .add_player(NewPlayer::new(name, 2, "", character))
            .unwrap();
    }
    store
}

#[test]
fn skip_roll_outcomes_track_published_odds() {
    for streak in 0..=3_u32 {
        let mut store = roster_store(RngBundle::from_user_seed(0x5EED + u64::from(streak)));
        let id = store.players()[0].id;
        let mut counts = [0_usize; 3];
        for _ in 0..SAMPLE_SIZE {
            store.with_data_mut(|data| {
                data.phase = Phase::Round;
                data.active_player_id = Some(id);
                if let Some(p) = data.player_mut(id) {
                    p.stats.skip_streak = streak;
                }
            });
            let slot = match store.skip_dare().unwrap() {
                SkipRollResult::Safe => 0,
                SkipRollResult::Punishment => 1,
                SkipRollResult::WorseDare => 2,
            };
            counts[slot] += 1;
        }
        let chances = calculate_skip_chances(streak);
        let expected = [chances.safe, chances.punishment, chances.worse_dare];
        for (count, pct) in counts.iter().zip(expected) {
            let observed = ratio(*count, SAMPLE_SIZE);
            let target = f64::from(pct) / 100.0;
            assert!(
                (observed - target).abs() < TOLERANCE,
                "streak {streak}: observed {observed:.3} vs {target:.3}"
            );
        }
    }
}

#[test]
fn roulette_frequencies_follow_weights() {
    let mut store = roster_store(FixedRandom(0.0));
    let last = store.players()[0].id;
    store.with_data_mut(|data| {
        if let Some(p) = data.player_mut(data.players[2].id) {
            p.stats.skip_streak = 2;
        }
    });
    let players = store.players().to_vec();
    let weights = roulette_weights(&players, Some(last));
    let total: f64 = weights.iter().sum();

    let mut rng = RngBundle::from_user_seed(42);
    let mut counts = [0_usize; 3];
    for _ in 0..SAMPLE_SIZE {
        let id = spin(&players, Some(last), &mut rng).unwrap();
        let idx = players.iter().position(|p| p.id == id).unwrap();
        counts[idx] += 1;
    }
    for (count, weight) in counts.iter().zip(weights.iter()) {
        let observed = ratio(*count, SAMPLE_SIZE);
        assert!((observed - weight / total).abs() < TOLERANCE);
    }
    assert!(counts[0] < counts[1]);
    assert!(counts[1] < counts[2]);
}

#[test]
fn random_events_fire_at_configured_rate() {
    let mut store = roster_store(RngBundle::from_user_seed(0xE7E7));
    store.set_total_rounds(15);
    let id = store.players()[0].id;
    let mut events = 0;
    for _ in 0..SAMPLE_SIZE {
        store.with_data_mut(|data| {
            data.phase = Phase::Proof;
            data.current_round = 1;
            data.active_player_id = Some(id);
        });
        if store.next_phase() == Phase::Event {
            events += 1;
        }
    }
    assert!((ratio(events, SAMPLE_SIZE) - 0.25).abs() < TOLERANCE);
    assert_eq!(store.players()[0].stats.events_triggered as usize, events);
    assert!(store.rng().draws(RollStream::Event) >= SAMPLE_SIZE as u64);
}
