use etbd::config::{AppConfig, ArrangementSettings, ScheduleSettings, ScheduleType};
use etbd::data::CsvConnector;
use etbd::engines::experiment::{Experiment, SilentProgressCallback};
use etbd::ResultTable;

/// Population 20, 8-bit genomes, one FR4 reinforcement schedule on 100-127.
fn fr4_config(reps: usize, seed: u64) -> AppConfig {
    let mut config = AppConfig::default();
    config.experiment.reps = reps;
    config.experiment.gens = 50;
    config.experiment.seed = Some(seed);
    config.experiment.log_progress = false;
    config.organism.population_size = 20;
    config.organism.genome_bits = 8;
    config.algorithm.fdf_mean = 10.0;
    config.arrangements = vec![ArrangementSettings::new(vec![
        ScheduleSettings::reinforcement(ScheduleType::FixedRatio, 4, 100, 127),
    ])];
    config
}

fn run(config: AppConfig) -> ResultTable {
    Experiment::new(config)
        .unwrap()
        .run(&SilentProgressCallback)
        .unwrap()
}

fn csv_bytes(table: &ResultTable) -> Vec<u8> {
    let mut buffer = Vec::new();
    table.write_csv_to(&mut buffer).unwrap();
    buffer
}

#[test]
fn test_fr4_delivers_once_per_four_in_class_responses() {
    let reps = 200;
    let table = run(fr4_config(reps, 2024));
    assert_eq!(table.len(), reps * 50);

    for rep in 0..reps {
        let rows: Vec<_> = table.records().iter().filter(|r| r.rep == rep).collect();
        assert_eq!(rows.len(), 50);

        let in_class = rows.iter().filter(|r| r.behaviors[0]).count();
        let reinforced = rows.iter().filter(|r| r.reinforcements[0]).count();
        assert_eq!(reinforced, in_class / 4, "rep {}", rep);

        for row in &rows {
            assert_eq!(row.behaviors[0], (100..=127).contains(&row.emission));
            assert!(!row.punishments[0]);
        }
    }
}

#[test]
fn test_fr4_in_class_responding_increases() {
    let table = run(fr4_config(200, 7));

    let early = table
        .records()
        .iter()
        .filter(|r| r.generation < 25 && r.behaviors[0])
        .count();
    let late = table
        .records()
        .iter()
        .filter(|r| r.generation >= 25 && r.behaviors[0])
        .count();

    println!("in-class emissions: first half {}, second half {}", early, late);
    assert!(late > early);
}

#[test]
fn test_identical_seed_gives_identical_output() {
    let first = csv_bytes(&run(fr4_config(4, 31)));
    let second = csv_bytes(&run(fr4_config(4, 31)));
    let other = csv_bytes(&run(fr4_config(4, 32)));

    assert_eq!(first, second);
    assert_ne!(first, other);
}

#[test]
fn test_population_reinitialized_per_arrangement() {
    let mut config = fr4_config(3, 5);
    config.experiment.reinitialize_population = false;
    config.arrangements.push(ArrangementSettings::new(vec![
        ScheduleSettings::reinforcement(ScheduleType::VariableInterval, 3, 0, 50),
        ScheduleSettings::punishment(ScheduleType::RandomRatio, 2, 200, 255),
    ]));

    let table = run(config.clone());
    assert_eq!(table.schedule_columns(), 2);
    assert_eq!(table.len(), 3 * 2 * 50);

    config.experiment.reinitialize_population = true;
    let reinitialized = run(config);
    // Arrangement 0 is unaffected by the flag, arrangement 1 starts from a new population
    let first_arrangement = |t: &ResultTable| {
        t.records()
            .iter()
            .filter(|r| r.arrangement == 0)
            .cloned()
            .collect::<Vec<_>>()
    };
    assert_eq!(first_arrangement(&table), first_arrangement(&reinitialized));
    assert_ne!(table, reinitialized);
}

#[test]
fn test_results_written_to_disk() {
    let dir = std::env::temp_dir().join(format!("etbd-end-to-end-{}", std::process::id()));
    let path = dir.join("fr4.csv");

    let table = run(fr4_config(2, 11));
    table.write_csv(&path).unwrap();

    let df = CsvConnector::load(&path).unwrap();
    assert_eq!(df.height(), 100);
    assert_eq!(df.width(), 7);
    assert_eq!(std::fs::read(&path).unwrap(), csv_bytes(&table));

    std::fs::remove_dir_all(&dir).unwrap();
}
