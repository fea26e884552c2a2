use super::csv::CsvConnector;
use crate::error::Result;
use crate::types::GenerationRecord;
use polars::prelude::*;
use std::io::Write;
use std::path::Path;

/// Generation-by-generation output of an experiment.
///
/// Columns are `Rep, Sch, Gen, Emissions` followed by a `B{i}, R{i}, P{i}`
/// triple per schedule slot. Arrangements with fewer schedules than
/// `schedule_columns` record 0 in the missing slots.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    schedule_columns: usize,
    records: Vec<GenerationRecord>,
}

impl ResultTable {
    pub fn new(schedule_columns: usize, records: Vec<GenerationRecord>) -> Self {
        Self {
            schedule_columns,
            records,
        }
    }

    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn schedule_columns(&self) -> usize {
        self.schedule_columns
    }

    pub fn in_class_count(&self, schedule: usize) -> usize {
        self.count(|r| r.behaviors.get(schedule).copied().unwrap_or(false))
    }

    pub fn reinforcement_count(&self, schedule: usize) -> usize {
        self.count(|r| r.reinforcements.get(schedule).copied().unwrap_or(false))
    }

    pub fn punishment_count(&self, schedule: usize) -> usize {
        self.count(|r| r.punishments.get(schedule).copied().unwrap_or(false))
    }

    fn count<F: Fn(&GenerationRecord) -> bool>(&self, predicate: F) -> usize {
        self.records.iter().filter(|r| predicate(r)).count()
    }

    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = vec![
            Column::new("Rep".into(), self.map_u64(|r| r.rep as u64)),
            Column::new("Sch".into(), self.map_u64(|r| r.arrangement as u64)),
            Column::new("Gen".into(), self.map_u64(|r| r.generation as u64)),
            Column::new(
                "Emissions".into(),
                self.records.iter().map(|r| r.emission).collect::<Vec<u32>>(),
            ),
        ];

        for i in 0..self.schedule_columns {
            columns.push(self.indicator(format!("B{}", i), |r| &r.behaviors, i));
            columns.push(self.indicator(format!("R{}", i), |r| &r.reinforcements, i));
            columns.push(self.indicator(format!("P{}", i), |r| &r.punishments, i));
        }

        Ok(DataFrame::new(columns)?)
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut df = self.to_dataframe()?;
        CsvConnector::write(path, &mut df)
    }

    pub fn write_csv_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut df = self.to_dataframe()?;
        CsvConnector::write_to(writer, &mut df)
    }

    fn map_u64<F: Fn(&GenerationRecord) -> u64>(&self, f: F) -> Vec<u64> {
        self.records.iter().map(f).collect()
    }

    fn indicator<F>(&self, name: String, field: F, schedule: usize) -> Column
    where
        F: Fn(&GenerationRecord) -> &Vec<bool>,
    {
        let values: Vec<i32> = self
            .records
            .iter()
            .map(|r| i32::from(field(r).get(schedule).copied().unwrap_or(false)))
            .collect();
        Column::new(name.into(), values)
    }
}
