use super::*;

/// The ordered transform chain.
///
/// Later steps assume the state left by earlier ones, e.g. blur radius is
/// expressed in post-warp pixels, so the order is fixed.
#[derive(Debug)]
pub struct TransformChain {
    transforms: Vec<Box<dyn Transform>>,
}

impl TransformChain {
    /// Builds the chain for a temperature, optionally ending with pixel
    /// dropout.
    pub fn from_temperature(temperature: f64, pixel_dropout: bool) -> Result<Self> {
        let exposure = Exposure::from_temperature(temperature);
        exposure
            .check_feasible()
            .with_context(|| format!("temperature {} is not usable", temperature))?;

        let mut transforms: Vec<Box<dyn Transform>> = vec![
            Box::new(WhiteBalance::from_temperature(temperature)),
            Box::new(exposure),
            Box::new(Rotation::from_temperature(temperature)),
            Box::new(Mirror::default()),
            Box::new(LensDistortion::from_temperature(temperature)),
            Box::new(GaussianBlur::default()),
        ];
        if pixel_dropout {
            transforms.push(Box::new(PixelDropout::from_temperature(temperature)));
        }

        Ok(Self { transforms })
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn kinds(&self) -> Vec<TransformKind> {
        self.transforms.iter().map(|step| step.kind()).collect()
    }

    /// Runs every step in order, handing each record to `on_record` as soon as
    /// it is drawn.
    pub fn forward<F>(
        &self,
        image: &mut RgbImage,
        rng: &mut StdRng,
        mut on_record: F,
    ) -> Result<Vec<AugmentationRecord>>
    where
        F: FnMut(&AugmentationRecord) -> Result<()>,
    {
        self.transforms
            .iter()
            .map(|step| {
                let record = step.forward(image, rng)?;
                debug!("applied {}", step.kind());
                on_record(&record)?;
                Ok(record)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_order_is_fixed() {
        let chain = TransformChain::from_temperature(1.0, true).unwrap();
        assert_eq!(
            chain.kinds(),
            vec![
                TransformKind::WhiteBalance,
                TransformKind::Exposure,
                TransformKind::Rotation,
                TransformKind::Mirror,
                TransformKind::LensDistortion,
                TransformKind::GaussianBlur,
                TransformKind::PixelDropout,
            ]
        );
        assert_eq!(TransformChain::from_temperature(1.0, false).unwrap().len(), 6);
    }

    #[test]
    fn chain_rejects_zero_temperature() {
        assert!(TransformChain::from_temperature(0.0, false).is_err());
    }

    #[test]
    fn chain_records_follow_chain_order() {
        let chain = TransformChain::from_temperature(2.0, false).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let mut image = RgbImage::from_pixel(24, 24, Rgb([120, 130, 140]));
        let mut seen = vec![];

        let records = chain
            .forward(&mut image, &mut rng, |record| {
                seen.push(record.kind());
                Ok(())
            })
            .unwrap();

        assert_eq!(seen, chain.kinds());
        assert_eq!(records.len(), 6);
        assert_eq!(image.dimensions(), (24, 24));
    }
}
