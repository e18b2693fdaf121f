use burn::{
    nn::{
        loss::{MseLoss, Reduction},
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::relu,
};

use crate::domain::image::IMAGE_PIXELS;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct AutoencoderConfig {
    #[config(default = 784)]
    pub input_dim:  usize,
    #[config(default = 128)]
    pub hidden_dim: usize,
    #[config(default = 128)]
    pub latent_dim: usize,
}

impl AutoencoderConfig {
    /// Default MNIST topology 784→128→128→128→784 with the given widths.
    pub fn mnist(hidden_dim: usize, latent_dim: usize) -> Self {
        Self::new()
            .with_input_dim(IMAGE_PIXELS)
            .with_hidden_dim(hidden_dim)
            .with_latent_dim(latent_dim)
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> Autoencoder<B> {
        Autoencoder {
            encoder_hidden: LinearConfig::new(self.input_dim,  self.hidden_dim).init(device),
            encoder_latent: LinearConfig::new(self.hidden_dim, self.latent_dim).init(device),
            decoder_hidden: LinearConfig::new(self.latent_dim, self.hidden_dim).init(device),
            decoder_output: LinearConfig::new(self.hidden_dim, self.input_dim).init(device),
        }
    }
}

/// Fully-connected autoencoder with ReLU after every layer.
#[derive(Module, Debug)]
pub struct Autoencoder<B: Backend> {
    pub encoder_hidden: Linear<B>,
    pub encoder_latent: Linear<B>,
    pub decoder_hidden: Linear<B>,
    pub decoder_output: Linear<B>,
}

impl<B: Backend> Autoencoder<B> {
    /// z = relu(W2·relu(W1·x + b1) + b2)
    ///
    /// x: [batch, input_dim] → z: [batch, latent_dim]
    pub fn encode(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let h = relu(self.encoder_hidden.forward(x));
        relu(self.encoder_latent.forward(h))
    }

    /// x̂ = relu(W4·relu(W3·z + b3) + b4)
    ///
    /// z: [batch, latent_dim] → x̂: [batch, input_dim]
    pub fn decode(&self, z: Tensor<B, 2>) -> Tensor<B, 2> {
        let h = relu(self.decoder_hidden.forward(z));
        relu(self.decoder_output.forward(h))
    }

    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        self.decode(self.encode(x))
    }

    /// Reconstruction loss (MSE averaged over every element) and
    /// the reconstruction itself.
    pub fn forward_loss(&self, images: Tensor<B, 2>) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let output = self.forward(images.clone());
        let loss   = MseLoss::new().forward(output.clone(), images, Reduction::Mean);
        (loss, output)
    }
}
