use crate::{
    layer,
    options::{Format, Support},
    sink,
    terrain::Terrain,
};
use anyhow::{bail, Result};
use cotas::{
    output::{SupportRecord, ALTURA_ESTACA},
    support::{self, Stake},
    CotasError,
};
use log::debug;
use std::io::Write;

impl Support {
    pub fn run(&self) -> Result<()> {
        let features = layer::read_points(&self.input)?;
        let stakes = features
            .iter()
            .map(|feature| {
                Ok(Stake {
                    coord: feature.coord,
                    altura: feature.number(ALTURA_ESTACA)?,
                })
            })
            .collect::<Result<Vec<Stake>, CotasError>>()?;

        let terrain = Terrain::open(&self.terrain)?;
        let spacing = terrain.spacing(self.spacing)?;
        let now = std::time::Instant::now();
        let points = support::resample(&stakes, spacing, &terrain)?;
        debug!(
            "support; stakes: {}, points: {}, spacing: {:?}, exec: {:?}",
            stakes.len(),
            points.len(),
            spacing,
            now.elapsed()
        );
        let records = points
            .iter()
            .map(|point| SupportRecord::new(point, self.decimals));

        let mut out = sink::open(self.out.as_deref())?;
        match self.format {
            Format::Geojson => layer::write(
                &mut out,
                points.iter().zip(records).map(|(p, r)| (layer::point(p.coord), r)),
            )?,
            Format::Csv => {
                writeln!(out, "id,original_id,Distancia,x,y,z")?;
                for r in records {
                    writeln!(
                        out,
                        "{},{},{},{},{},{}",
                        r.id, r.original_id, r.distance, r.x, r.y, r.z
                    )?;
                }
            }
            Format::Json => {
                serde_json::to_writer(&mut out, &records.collect::<Vec<SupportRecord>>())?;
            }
            Format::Kml => bail!("KML output is only available for extract"),
        }
        out.flush()?;
        Ok(())
    }
}
