//! The EmbedNet architecture.
//!
//! A three-stage 1-D convolutional encoder over two-channel audio
//! windows, followed by a time average and a linear projection down to
//! the embedding. Inference only: batch norm always applies the running
//! statistics recorded at training time.

use candle_core::{D, Module, ModuleT, Result, Tensor};
use candle_nn::{
    BatchNorm, Conv1d, Conv1dConfig, Linear, VarBuilder, batch_norm, conv1d, linear,
};

/// Kernel size of the second and third convolutions.
pub(crate) const REFINE_KERNEL: usize = 3;
/// Max-pool window (and stride) after each stage.
pub(crate) const POOL: usize = 4;

/// Architecture hyperparameters.
///
/// The defaults describe the trained checkpoint; the `VarBuilder` paths
/// used by [`EmbedNet::new`] double as the checkpoint key prefixes, so
/// changing these only makes sense together with a retrained model.
#[derive(Debug, Clone, Copy)]
pub struct EmbedNetConfig {
    /// Samples per input window.
    pub input_size: usize,
    /// Input audio channels.
    pub in_channels: usize,
    /// Feature channels in the first two stages.
    pub internal_width: usize,
    /// Output embedding size.
    pub embed_size: usize,
    /// Kernel size of the first convolution.
    pub kernel_size: usize,
    /// Stride of the first convolution.
    pub stride: usize,
    /// Batch norm epsilon.
    pub bn_eps: f64,
}

impl Default for EmbedNetConfig {
    fn default() -> Self {
        Self {
            input_size: 2400,
            in_channels: 2,
            internal_width: 200,
            embed_size: 100,
            kernel_size: 80,
            stride: 16,
            bn_eps: 1e-5,
        }
    }
}

impl EmbedNetConfig {
    /// Time-axis lengths after each conv/pool, starting from
    /// `input_size`.
    pub fn stage_lens(&self) -> [usize; 6] {
        let conv = |len: usize, kernel: usize, stride: usize| (len - kernel) / stride + 1;
        let c1 = conv(self.input_size, self.kernel_size, self.stride);
        let p1 = c1 / POOL;
        let c2 = conv(p1, REFINE_KERNEL, 1);
        let p2 = c2 / POOL;
        let c3 = conv(p2, REFINE_KERNEL, 1);
        let p3 = c3 / POOL;
        [c1, p1, c2, p2, c3, p3]
    }
}

/// One conv/norm/pool stage.
#[derive(Debug)]
pub(crate) struct Stage {
    pub(crate) conv: Conv1d,
    pub(crate) norm: BatchNorm,
    pub(crate) kernel_size: usize,
    pub(crate) stride: usize,
}

#[derive(Debug)]
pub struct EmbedNet {
    stages: [Stage; 3],
    full_connect: Linear,
    cfg: EmbedNetConfig,
}

impl EmbedNet {
    /// Builds the network, pulling parameters out of `vb`.
    ///
    /// The lookup paths match the keys of the trained checkpoint:
    /// `layers.{0,3,6}` for the convolutions, `layers.{1,4,7}` for the
    /// batch norms and `full_connect` for the projection.
    pub fn new(cfg: EmbedNetConfig, vb: VarBuilder) -> Result<Self> {
        let layers = vb.pp("layers");
        let stage = |conv_idx: usize,
                     norm_idx: usize,
                     in_c: usize,
                     out_c: usize,
                     kernel_size: usize,
                     stride: usize|
         -> Result<Stage> {
            let conv = conv1d(
                in_c,
                out_c,
                kernel_size,
                Conv1dConfig {
                    stride,
                    ..Default::default()
                },
                layers.pp(conv_idx.to_string()),
            )?;
            let norm = batch_norm(out_c, cfg.bn_eps, layers.pp(norm_idx.to_string()))?;
            Ok(Stage {
                conv,
                norm,
                kernel_size,
                stride,
            })
        };

        let width = cfg.internal_width;
        let stages = [
            stage(0, 1, cfg.in_channels, width, cfg.kernel_size, cfg.stride)?,
            stage(3, 4, width, width, REFINE_KERNEL, 1)?,
            stage(6, 7, width, 2 * width, REFINE_KERNEL, 1)?,
        ];
        let full_connect = linear(2 * width, cfg.embed_size, vb.pp("full_connect"))?;

        Ok(Self {
            stages,
            full_connect,
            cfg,
        })
    }

    pub fn config(&self) -> &EmbedNetConfig {
        &self.cfg
    }

    pub(crate) fn stages(&self) -> &[Stage; 3] {
        &self.stages
    }

    pub(crate) fn full_connect(&self) -> &Linear {
        &self.full_connect
    }

    fn max_pool(xs: &Tensor) -> Result<Tensor> {
        // No 1-D pooling on tensors; run the 2-D kernel over (1, POOL).
        xs.unsqueeze(2)?.max_pool2d((1, POOL))?.squeeze(2)
    }
}

impl Module for EmbedNet {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let mut xs = xs.clone();
        for stage in &self.stages {
            xs = stage.norm.forward_t(&stage.conv.forward(&xs)?, false)?;
            xs = Self::max_pool(&xs)?;
        }
        // Average over whatever time steps remain, then project.
        let xs = xs.mean_keepdim(D::Minus1)?;
        let xs = xs.permute((0, 2, 1))?;
        self.full_connect.forward(&xs)
    }
}
