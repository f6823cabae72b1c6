use crate::{
    options::{ProfileCmd, ProfileOutput},
    plot,
    terrain::Terrain,
};
use anyhow::{anyhow, Result};
use cotas::{output::round, Profile, ProfileTask};
use geo::geometry::Coord;
use log::{debug, warn};
use serde::Serialize;
use std::{
    io::Write,
    sync::Arc,
    time::{Duration, Instant},
};

#[derive(Serialize)]
struct JsonRow {
    distance: f64,
    location: [f64; 2],
    elevation: Option<f64>,
}

impl ProfileCmd {
    pub fn run(&self) -> Result<()> {
        let path: Vec<Coord<f64>> = match &self.input {
            Some(input) => crate::layer::read_line(input)?,
            None => self.path.iter().map(|xy| xy.0).collect(),
        };
        let timeout = self.timeout.map(Duration::try_from_secs_f64).transpose()?;
        let terrain = Arc::new(Terrain::open(&self.terrain)?);

        let now = Instant::now();
        let task = ProfileTask::spawn(
            Profile::builder().path(path).step_size(self.step),
            terrain,
        );
        let profile = match timeout {
            None => task.wait()?,
            Some(timeout) => match task.wait_timeout(timeout) {
                Some(result) => result?,
                None => {
                    task.cancel();
                    warn!("profile not done after {timeout:?}, cancelled");
                    return Err(anyhow!("timed out after {timeout:?}"));
                }
            },
        };
        debug!(
            "profile; len: {}, exec: {:?}",
            profile.distances.len(),
            now.elapsed()
        );

        match self.output {
            ProfileOutput::Csv => {
                let mut out = std::io::stdout().lock();
                writeln!(out, "distance,x,y,elevation")?;
                for ((d, p), z) in profile
                    .distances
                    .iter()
                    .zip(&profile.points)
                    .zip(&profile.elevations)
                {
                    let z = z.map(|z| round(z).to_string()).unwrap_or_default();
                    writeln!(out, "{},{},{},{}", round(*d), p.x, p.y, z)?;
                }
            }
            ProfileOutput::Json => {
                let rows: Vec<JsonRow> = profile
                    .distances
                    .iter()
                    .zip(&profile.points)
                    .zip(&profile.elevations)
                    .map(|((d, p), z)| JsonRow {
                        distance: round(*d),
                        location: [p.x, p.y],
                        elevation: z.map(round),
                    })
                    .collect();
                println!("{}", serde_json::to_string(&rows)?);
            }
            ProfileOutput::Plot => plot::terminal(&[profile.samples().as_slice()]),
        }
        Ok(())
    }
}
