use conference_standings::{
    resolve_with_cascade, Arity, Cascade, CascadeRegistry, CascadeStep, Conference, Placements,
    Resolver, Rule, TeamId, TieGroup,
};
use proptest::prelude::*;

const MAX_TEAMS: usize = 8;
const MAX_PAIRS: usize = MAX_TEAMS * (MAX_TEAMS - 1) / 2;

/// Per pair: 0 not scheduled, 1 home win, 2 away win, 3 unplayed.
fn season() -> impl Strategy<Value = (usize, Vec<u8>, Vec<u32>)> {
    (
        2..=MAX_TEAMS,
        prop::collection::vec(0u8..4, MAX_PAIRS),
        prop::collection::vec(0u32..4, MAX_TEAMS),
    )
}

fn build(code: &str, (teams, pairs, non_conference): &(usize, Vec<u8>, Vec<u32>)) -> (Conference, Vec<TeamId>) {
    let mut conf = Conference::new("Generated", code);
    let ids: Vec<TeamId> = (0..*teams)
        .map(|i| conf.add_team(format!("Team {i}")).unwrap())
        .collect();

    let mut slot = 0;
    for i in 0..*teams {
        for j in i + 1..*teams {
            match pairs[slot] {
                1 => {
                    conf.add_game(ids[i], ids[j], Some(ids[i])).unwrap();
                }
                2 => {
                    conf.add_game(ids[i], ids[j], Some(ids[j])).unwrap();
                }
                3 => {
                    conf.add_game(ids[i], ids[j], None).unwrap();
                }
                _ => {}
            }
            slot += 1;
        }
        for _ in 0..non_conference[i] {
            conf.record_non_conference_result(ids[i], true).unwrap();
        }
    }
    (conf, ids)
}

fn multi_team_rule() -> impl Strategy<Value = Rule> {
    prop::sample::select(
        Rule::ALL
            .into_iter()
            .filter(|r| r.arity() == Arity::MultiTeam)
            .collect::<Vec<_>>(),
    )
}

fn sorted(mut teams: Vec<TeamId>) -> Vec<TeamId> {
    teams.sort_unstable();
    teams
}

proptest! {
    /// Resolution reorders a group but never adds or drops a team.
    #[test]
    fn prop_resolution_is_a_permutation(
        schedule in season(),
        code in prop::sample::select(vec!["ACC", "B12", "B1G", "SEC"]),
    ) {
        let registry = CascadeRegistry::builtin();
        let (conf, ids) = build(code, &schedule);
        let resolution = Resolver::new(&registry)
            .resolve(&conf, &TieGroup::new(ids.clone()).unwrap())
            .unwrap();
        prop_assert_eq!(sorted(resolution.teams()), sorted(ids.clone()));

        let standings = Resolver::new(&registry).standings(&conf).unwrap();
        prop_assert_eq!(sorted(standings.order()), sorted(ids));
    }

    /// Appending a step only ever refines the result.
    #[test]
    fn prop_appending_a_step_never_merges_groups(
        schedule in season(),
        base in prop::collection::vec(multi_team_rule(), 1..4),
        extra in multi_team_rule(),
        restart in any::<bool>(),
    ) {
        let (conf, ids) = build("TST", &schedule);
        let steps = base.into_iter().map(CascadeStep::same).collect();
        let short = Cascade::new("TST", "Generated", steps)
            .unwrap()
            .with_restart_on_reduction(restart);
        let long = short.extended(CascadeStep::same(extra)).unwrap();

        let group = TieGroup::new(ids).unwrap();
        let placements = Placements::new();
        let before = resolve_with_cascade(&short, &conf, &group, &placements).unwrap();
        let after = resolve_with_cascade(&long, &conf, &group, &placements).unwrap();

        prop_assert!(after.groups().len() >= before.groups().len());
        for part in after.tie_groups() {
            prop_assert!(before
                .tie_groups()
                .any(|g| part.iter().all(|t| g.contains(t))));
        }
    }

    /// Resolving and building standings never alter the schedule graph.
    #[test]
    fn prop_resolution_does_not_mutate(schedule in season()) {
        let registry = CascadeRegistry::builtin();
        let (conf, ids) = build("B12", &schedule);
        let before = conf.clone();
        let resolver = Resolver::new(&registry);
        resolver.resolve(&conf, &TieGroup::new(ids).unwrap()).unwrap();
        resolver.standings(&conf).unwrap();
        prop_assert_eq!(conf, before);
    }

    /// A lone team is always resolved to itself.
    #[test]
    fn prop_singleton_is_identity(schedule in season(), pick in 0usize..MAX_TEAMS) {
        let registry = CascadeRegistry::builtin();
        let (conf, ids) = build("SEC", &schedule);
        let team = ids[pick % ids.len()];
        let resolution = Resolver::new(&registry)
            .resolve(&conf, &TieGroup::singleton(team))
            .unwrap();
        prop_assert_eq!(resolution.teams(), vec![team]);
        prop_assert!(resolution.is_fully_ordered());
    }
}
