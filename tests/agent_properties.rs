//! Behavioural properties of the tabular agent

use qsnake::{
    Action, AgentConfig, Error, Position, TabularQAgent, ValueTable, adapters::InMemoryStore,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn config(grid_size: usize) -> AgentConfig {
    AgentConfig::new(grid_size)
        .with_learning_rate(0.5)
        .with_discount_factor(0.25)
        .with_exploration_rate(0.25)
        .with_seed(42)
}

/// Agent whose table starts as `table`
fn agent_with(table: &ValueTable) -> TabularQAgent {
    let store = InMemoryStore::with_contents(table.to_json().unwrap());
    TabularQAgent::new(config(table.grid_size()), store).unwrap()
}

fn random_table(grid_size: usize, rng: &mut StdRng) -> ValueTable {
    let rows = (0..grid_size)
        .map(|_| (0..grid_size).map(|_| rng.random_range(-100.0..100.0)).collect())
        .collect();
    ValueTable::from_rows(rows).unwrap()
}

#[test]
fn test_update_changes_exactly_one_cell() {
    let mut rng = StdRng::seed_from_u64(7);
    let grid_size = 6;

    for _ in 0..200 {
        let table = random_table(grid_size, &mut rng);
        let mut agent = agent_with(&table);
        let state = Position::new(
            rng.random_range(0..grid_size as i32),
            rng.random_range(0..grid_size as i32),
        );
        let next_state = Position::new(
            rng.random_range(0..grid_size as i32),
            rng.random_range(0..grid_size as i32),
        );

        let action = Action::ALL[rng.random_range(0..4)];
        let reward = rng.random_range(-20.0..20.0);
        agent.update(state, action, reward, next_state).unwrap();

        for x in 0..grid_size as i32 {
            for y in 0..grid_size as i32 {
                let pos = Position::new(x, y);
                if pos == state {
                    continue;
                }
                let before = table.get(pos).unwrap();
                let after = agent.value_at(pos).unwrap();
                assert_eq!(before.to_bits(), after.to_bits(), "cell {pos} changed");
            }
        }
    }
}

#[test]
fn test_uniform_updates_converge_to_discounted_fixed_point() {
    let mut agent = TabularQAgent::new(config(2), InMemoryStore::new()).unwrap();
    let reward = 10.0;
    let fixed_point = reward / (1.0 - 0.25);

    let cells: Vec<Position> = (0..2)
        .flat_map(|x| (0..2).map(move |y| Position::new(x, y)))
        .collect();

    let mut previous = 0.0;
    for _ in 0..10_000 {
        for &cell in &cells {
            agent.update(cell, Action::Up, reward, cell).unwrap();
        }
        let value = agent.value_at(cells[0]).unwrap();
        assert!(value >= previous, "value decreased: {previous} -> {value}");
        previous = value;
    }

    for &cell in &cells {
        let value = agent.value_at(cell).unwrap();
        assert!(
            (value - fixed_point).abs() < 1e-3,
            "cell {cell} at {value}, expected {fixed_point}"
        );
    }
}

#[test]
fn test_isolated_cell_converges_to_reward() {
    let mut agent = TabularQAgent::new(config(5), InMemoryStore::new()).unwrap();
    let cell = Position::new(2, 2);

    for _ in 0..10_000 {
        agent.update(cell, Action::Right, 10.0, cell).unwrap();
    }
    // its neighbours never move off zero
    assert!((agent.value_at(cell).unwrap() - 10.0).abs() < 1e-3);
}

#[test]
fn test_exploration_boundary() {
    let mut table = ValueTable::zeros(5);
    table.set(Position::new(3, 2), 1.0).unwrap();
    let agent = agent_with(&table);
    let state = Position::new(2, 2);

    // draw < ε explores: 0.0 maps to the first action
    assert_eq!(agent.select_action(state, 0.0), Action::Up);
    assert_eq!(agent.select_action(state, 0.2499), Action::Right);

    // draw ≥ ε exploits: the only positive neighbour is to the right
    assert_eq!(agent.select_action(state, 0.25), Action::Right);
    assert_eq!(agent.select_action(state, 0.9999), Action::Right);
}

#[test]
fn test_exploration_covers_every_action() {
    let agent = TabularQAgent::new(config(5), InMemoryStore::new()).unwrap();
    let state = Position::new(2, 2);
    let mut seen = [false; 4];
    for i in 0..250 {
        let draw = f64::from(i) / 1000.0;
        seen[agent.select_action(state, draw).index()] = true;
    }
    assert_eq!(seen, [true; 4]);
}

#[test]
fn test_corner_falls_back_deterministically() {
    let grid_size = 5;
    let corner = Position::new(grid_size as i32 - 1, grid_size as i32 - 1);
    let agent = TabularQAgent::new(config(grid_size), InMemoryStore::new()).unwrap();

    // Up and Left stay on the grid; with equal scores the first seen wins.
    assert_eq!(agent.select_action(corner, 0.5), Action::Up);

    let mut table = ValueTable::zeros(grid_size);
    table.set(Position::new(3, 4), 2.0).unwrap();
    let agent = agent_with(&table);
    assert_eq!(agent.select_action(corner, 0.5), Action::Left);
}

#[test]
fn test_off_grid_state_falls_back_to_up() {
    let agent = TabularQAgent::new(config(3), InMemoryStore::new()).unwrap();
    assert_eq!(agent.select_action(Position::new(10, 10), 0.9), Action::Up);
    assert_eq!(agent.select_action(Position::new(-5, 40), 0.9), Action::Up);
}

#[test]
fn test_extreme_coordinates_fall_back_to_up() {
    let mut agent = TabularQAgent::new(config(5), InMemoryStore::new()).unwrap();
    for state in [
        Position::new(i32::MAX, 0),
        Position::new(i32::MIN, i32::MIN),
        Position::new(0, i32::MAX),
        Position::new(i32::MAX, i32::MIN),
    ] {
        assert_eq!(agent.select_action(state, 0.9), Action::Up, "{state}");
    }

    // as a next state it is rejected like any other off-grid cell
    let result = agent.update(
        Position::new(2, 2),
        Action::Up,
        1.0,
        Position::new(i32::MIN, i32::MAX),
    );
    assert!(matches!(result, Err(Error::PositionOutOfBounds { .. })));
    assert_eq!(agent.table(), &ValueTable::zeros(5));
}

#[test]
fn test_worked_update_example() {
    let mut agent = TabularQAgent::new(config(5), InMemoryStore::new()).unwrap();
    let cell = Position::new(2, 2);

    agent.update(cell, Action::Right, 10.0, cell).unwrap();
    assert_eq!(agent.value_at(cell).unwrap(), 5.0);

    // (2, 2) is a neighbour of (2, 1), so its own 5.0 enters the target
    agent
        .update(cell, Action::Right, 10.0, Position::new(2, 1))
        .unwrap();
    assert_eq!(agent.value_at(cell).unwrap(), 8.125);
}

#[test]
fn test_out_of_range_update_is_an_error() {
    let mut agent = TabularQAgent::new(config(5), InMemoryStore::new()).unwrap();
    let result = agent.update(Position::new(0, 5), Action::Down, 1.0, Position::new(0, 0));
    assert!(matches!(
        result,
        Err(Error::PositionOutOfBounds { x: 0, y: 5, grid_size: 5 })
    ));
    assert_eq!(agent.table(), &ValueTable::zeros(5));
}
