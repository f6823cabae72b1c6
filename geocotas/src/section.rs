use crate::{layer, options::Section, plot, terrain::Terrain};
use anyhow::Result;
use cotas::{
    output::{SectionReport, ALTURA_ESTACA, COTA_ESTACA},
    section::{corte_line, terreno_line},
    support::{self, Stake},
    CotasError, CrossSection, Estaca,
};
use log::info;

impl Section {
    pub fn run(&self) -> Result<()> {
        let features = layer::read_points(&self.input)?;
        let estacas = features
            .iter()
            .map(|feature| {
                let cota = feature.number(COTA_ESTACA)?;
                let altura = feature.number(ALTURA_ESTACA)?;
                Ok(Estaca {
                    coord: feature.coord,
                    z: cota - altura,
                    cota,
                    altura,
                })
            })
            .collect::<Result<Vec<Estaca>, CotasError>>()?;
        let stakes: Vec<Stake> = estacas
            .iter()
            .map(|e| Stake {
                coord: e.coord,
                altura: e.altura,
            })
            .collect();

        let terrain = Terrain::open(&self.terrain)?;
        let support = support::resample(&stakes, terrain.spacing(self.spacing)?, &terrain)?;
        let section = CrossSection::builder()
            .corte(corte_line(&estacas))
            .terreno(terreno_line(&support))
            .talude_angle(self.angle)
            .build()?;
        info!(
            "section; aterro: {:.3}, corte: {:.3}, regions: {}",
            section.areas.aterro,
            section.areas.corte,
            section.areas.regions.len()
        );

        let report = SectionReport::new(&section, self.decimals);
        println!("{}", serde_json::to_string_pretty(&report)?);

        if self.plot {
            plot::terminal(&[section.terreno.as_slice(), section.corte.as_slice()]);
        }
        if let Some(path) = &self.svg {
            plot::svg(path, &section)?;
        }
        Ok(())
    }
}
