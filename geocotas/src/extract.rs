use crate::{
    kml_cells, layer,
    options::{Extract, Format},
    progress, sink,
};
use anyhow::{anyhow, Result};
use cotas::{
    dem::{PixelGrid, Raster},
    extract::{self, CotaCell, CotaPoint},
    output::CotaRecord,
    ElevationRange,
};
use log::info;
use std::{
    fs::File,
    io::{BufWriter, Write},
};

impl Extract {
    pub fn run(&self) -> Result<()> {
        let raster = Raster::open(&self.raster)?;
        let grid = raster.grid();
        let pb = progress::bar(
            format!("Sampling {}", self.raster.display()),
            grid.len() as u64,
        );
        let points = extract::points_with_progress(grid, &raster, |n| pb.inc(n as u64));
        pb.finish_and_clear();
        let range = extract::range(&points);
        info!(
            "{} of {} pixels sampled, range: {:?}",
            points.len(),
            grid.len(),
            range
        );

        if self.format == Format::Kml {
            return self.write_kml(grid, points, range);
        }

        let mut out = sink::open(self.out.as_deref())?;
        match self.format {
            Format::Geojson => layer::write(
                &mut out,
                points.iter().map(|point| {
                    let geometry = if self.cells {
                        layer::polygon(&grid.cell_polygon(point.row, point.col))
                    } else {
                        layer::point(point.coord)
                    };
                    (geometry, CotaRecord::new(point, self.decimals))
                }),
            )?,
            Format::Csv => {
                writeln!(out, "id,row,col,x,y,z")?;
                for point in &points {
                    let r = CotaRecord::new(point, self.decimals);
                    writeln!(out, "{},{},{},{},{},{}", r.id, r.row, r.col, r.x, r.y, r.z)?;
                }
            }
            Format::Json => {
                let records: Vec<CotaRecord> = points
                    .iter()
                    .map(|point| CotaRecord::new(point, self.decimals))
                    .collect();
                serde_json::to_writer(&mut out, &records)?;
            }
            Format::Kml => (),
        }
        out.flush()?;
        Ok(())
    }

    fn write_kml(
        &self,
        grid: &PixelGrid,
        points: Vec<CotaPoint>,
        range: Option<ElevationRange>,
    ) -> Result<()> {
        let path = self
            .out
            .as_ref()
            .ok_or_else(|| anyhow!("KML output needs --out"))?;
        let cells: Vec<CotaCell> = points
            .into_iter()
            .map(|point| CotaCell {
                polygon: grid.cell_polygon(point.row, point.col),
                point,
            })
            .collect();
        let range = range.unwrap_or(ElevationRange { min: 0.0, max: 0.0 });
        let mut out = BufWriter::new(File::create(path)?);
        kml_cells::write_cells(
            &mut out,
            &cells,
            &range,
            self.classes,
            self.extrude,
            self.decimals,
        )?;
        out.flush()?;
        Ok(())
    }
}
