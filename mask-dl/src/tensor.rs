use crate::common::*;

pub trait TensorExt {
    fn resize2d_exact(&self, new_height: i64, new_width: i64) -> Result<Tensor>;

    fn f_center_crop(&self, crop_height: i64, crop_width: i64) -> Result<Tensor>;

    fn center_crop(&self, crop_height: i64, crop_width: i64) -> Tensor {
        self.f_center_crop(crop_height, crop_width).unwrap()
    }

    fn f_rgb_to_hsv(&self) -> Result<Tensor>;

    fn rgb_to_hsv(&self) -> Tensor {
        self.f_rgb_to_hsv().unwrap()
    }

    fn f_hsv_to_rgb(&self) -> Result<Tensor>;

    fn hsv_to_rgb(&self) -> Tensor {
        self.f_hsv_to_rgb().unwrap()
    }

    fn normalize_channels(&self, mean: &[f64; 3], std: &[f64; 3]) -> Result<Tensor>;

    fn denormalize_channels(&self, mean: &[f64; 3], std: &[f64; 3]) -> Result<Tensor>;
}

impl TensorExt for Tensor {
    fn resize2d_exact(&self, new_height: i64, new_width: i64) -> Result<Tensor> {
        tch::no_grad(|| match (self.kind(), self.size().as_slice()) {
            (Kind::Uint8, &[_n_channels, _height, _width]) => {
                ensure!(
                    new_height > 0 && new_width > 0,
                    "target size must be positive, but get ({}, {})",
                    new_height,
                    new_width
                );
                let resized = vision::image::resize(self, new_width, new_height)?;
                Ok(resized)
            }
            (Kind::Float, &[_n_channels, _height, _width]) => {
                ensure!(
                    new_height > 0 && new_width > 0,
                    "target size must be positive, but get ({}, {})",
                    new_height,
                    new_width
                );
                let resized = vision::image::resize(
                    &(self * 255.0).to_kind(Kind::Uint8),
                    new_width,
                    new_height,
                )?
                .to_kind(Kind::Float)
                    / 255.0;
                Ok(resized)
            }
            (_, &[_n_channels, _height, _width]) => bail!("unsupported data kind"),
            _ => bail!("invalid shape: expect three dimensions"),
        })
    }

    fn f_center_crop(&self, crop_height: i64, crop_width: i64) -> Result<Tensor> {
        tch::no_grad(|| -> Result<_> {
            let (_channels, height, width) = self.size3()?;
            ensure!(
                crop_height > 0 && crop_width > 0,
                "crop size must be positive, but get ({}, {})",
                crop_height,
                crop_width
            );
            ensure!(
                crop_height <= height && crop_width <= width,
                "crop size ({}, {}) exceeds the input size ({}, {})",
                crop_height,
                crop_width,
                height,
                width
            );

            let top = (height - crop_height) / 2;
            let left = (width - crop_width) / 2;
            let cropped = self
                .narrow(1, top, crop_height)
                .narrow(2, left, crop_width)
                .contiguous();
            Ok(cropped)
        })
    }

    fn f_rgb_to_hsv(&self) -> Result<Tensor> {
        let eps = 1e-4;
        let rgb = self;
        let (channels, _height, _width) = rgb.size3()?;
        ensure!(
            channels == 3,
            "channel size must be 3, but get {}",
            channels
        );

        let red = rgb.select(0, 0);
        let green = rgb.select(0, 1);
        let blue = rgb.select(0, 2);

        let (max, argmax) = rgb.max_dim(0, false);
        let (min, _argmin) = rgb.min_dim(0, false);
        let diff = &max - &min;

        let value = max;
        let saturation = (&diff / &value).where_self(&value.gt(eps), &value.zeros_like());

        let case1 = value.zeros_like();
        let case2 = (&green - &blue) / &diff;
        let case3 = (&blue - &red) / &diff + 2.0;
        let case4 = (&red - &green) / &diff + 4.0;

        let hue = {
            let hue = case1.where_self(
                &diff.le(eps),
                &case2.where_self(&argmax.eq(0), &case3.where_self(&argmax.eq(1), &case4)),
            );
            let hue = hue.where_self(&hue.ge(0.0), &(&hue + 6.0));
            hue / 6.0
        };

        let hsv = Tensor::stack(&[hue, saturation, value], 0);

        debug_assert!(
            !bool::from(hsv.isnan().any()),
            "NaN detected in RGB to HSV conversion"
        );

        Ok(hsv)
    }

    fn f_hsv_to_rgb(&self) -> Result<Tensor> {
        let hsv = self;
        let (channels, _height, _width) = hsv.size3()?;
        ensure!(
            channels == 3,
            "channel size must be 3, but get {}",
            channels
        );

        let hue = hsv.select(0, 0);
        let saturation = hsv.select(0, 1);
        let value = hsv.select(0, 2);

        let func = |n: f64| {
            let k = (&hue * 6.0 + n).fmod(6.0);
            &value - &value * &saturation * k.minimum(&(-&k + 4.0)).clamp(0.0, 1.0)
        };

        let red = func(5.0);
        let green = func(3.0);
        let blue = func(1.0);
        let rgb = Tensor::stack(&[red, green, blue], 0);

        Ok(rgb)
    }

    fn normalize_channels(&self, mean: &[f64; 3], std: &[f64; 3]) -> Result<Tensor> {
        tch::no_grad(|| -> Result<_> {
            let (channels, _height, _width) = self.size3()?;
            ensure!(
                channels == 3,
                "channel size must be 3, but get {}",
                channels
            );
            ensure!(
                std.iter().all(|&value| value > 0.0),
                "std must be positive, but get {:?}",
                std
            );

            let mean = Tensor::of_slice(mean)
                .to_kind(Kind::Float)
                .to_device(self.device())
                .view([3, 1, 1]);
            let std = Tensor::of_slice(std)
                .to_kind(Kind::Float)
                .to_device(self.device())
                .view([3, 1, 1]);
            Ok((self - &mean) / &std)
        })
    }

    fn denormalize_channels(&self, mean: &[f64; 3], std: &[f64; 3]) -> Result<Tensor> {
        tch::no_grad(|| -> Result<_> {
            let (channels, _height, _width) = self.size3()?;
            ensure!(
                channels == 3,
                "channel size must be 3, but get {}",
                channels
            );
            ensure!(
                std.iter().all(|&value| value > 0.0),
                "std must be positive, but get {:?}",
                std
            );

            let mean = Tensor::of_slice(mean)
                .to_kind(Kind::Float)
                .to_device(self.device())
                .view([3, 1, 1]);
            let std = Tensor::of_slice(std)
                .to_kind(Kind::Float)
                .to_device(self.device())
                .view([3, 1, 1]);
            Ok((self * &std + &mean).clamp(0.0, 1.0))
        })
    }
}
